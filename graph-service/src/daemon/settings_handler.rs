use super::respond;
use crate::protocol::ServiceResponse;
use graph_core::HistoryReport;
use graph_host::HostHandle;

fn history_message(prefix: &str, report: &HistoryReport) -> String {
    format!(
        "{prefix} ({} evicted, {} archived, {} pruned)",
        report.evicted.len(),
        report.archived.len(),
        report.pruned.len()
    )
}

pub fn set_ui_history(host: &HostHandle, count: usize) -> ServiceResponse {
    respond(host.set_ui_history(count), |report| {
        ServiceResponse::ok(history_message(
            &format!("History set to {count} pages"),
            &report,
        ))
    })
}

pub fn set_archive_size(host: &HostHandle, size_mb: u64) -> ServiceResponse {
    respond(host.set_archive_size(size_mb), |()| {
        if size_mb == 0 {
            ServiceResponse::ok("Archiving disabled")
        } else {
            ServiceResponse::ok(format!("Archive limited to {size_mb} MB"))
        }
    })
}

pub fn settings_show(host: &HostHandle) -> ServiceResponse {
    respond(host.settings(), |settings| ServiceResponse::Settings { settings })
}

pub fn settings_set(host: &HostHandle, json: &str) -> ServiceResponse {
    respond(host.update_settings(json), |report| {
        ServiceResponse::ok(history_message("Settings updated", &report))
    })
}
