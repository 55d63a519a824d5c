use eframe::egui::{self, RichText};
use std::time::{Duration, Instant};

const TOAST_SECONDS: f32 = 2.8;
const SLIDE_IN: f32 = 0.35;
const SLIDE_OUT: f32 = 0.45;
const MAX_WIDTH: f32 = 380.0;

#[derive(Debug, Clone)]
pub(crate) struct Notification {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) created_at: Instant,
}

/// Toasts stacked in the top-right corner until they expire.
pub struct NotificationHandler {
    notifications: Vec<Notification>,
}

impl NotificationHandler {
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
        }
    }

    pub fn show_info(&mut self, title: &str, message: &str) {
        self.notifications.push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            created_at: Instant::now(),
        });
    }

    pub fn cleanup_old_notifications(&mut self, max_age_secs: f32) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.created_at).as_secs_f32() < max_age_secs);
    }

    /// Draws every live toast, sliding it in from the right edge and back
    /// out before it expires.
    ///
    /// # Parameters
    /// - `ctx`: egui context for painting foreground areas
    ///
    /// # Side Effects
    /// - Drops expired toasts
    /// - Requests a repaint while any toast is animating
    pub fn render(&mut self, ctx: &egui::Context) {
        if self.notifications.is_empty() {
            return;
        }

        let now = Instant::now();
        let screen = ctx.screen_rect();
        let right_edge = screen.max.x - 4.0;
        let mut top = screen.min.y + 32.0;
        let fill = egui::Color32::from_rgba_premultiplied(20, 20, 20, 200);
        let border = egui::Color32::from_rgba_premultiplied(80, 80, 80, 200);
        let ink = egui::Color32::from_rgba_premultiplied(235, 235, 235, 230);

        for (slot, toast) in self.notifications.iter().enumerate() {
            let age = now.duration_since(toast.created_at).as_secs_f32();
            let Some(shown) = slide_fraction(age) else {
                continue;
            };
            let offset = (1.0 - shown) * (MAX_WIDTH + 24.0);

            egui::Area::new(egui::Id::new(("graph_toast", slot)))
                .order(egui::Order::Foreground)
                .interactable(false)
                .pivot(egui::Align2::RIGHT_TOP)
                .fixed_pos(egui::pos2(right_edge + offset, top))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .fill(fill)
                        .stroke(egui::Stroke::new(1.0, border))
                        .rounding(egui::Rounding::same(6.0))
                        .show(ui, |ui| {
                            ui.set_max_width(MAX_WIDTH);
                            ui.label(RichText::new(&toast.title).color(ink).strong().size(16.0));
                            ui.label(RichText::new(&toast.message).color(ink).size(14.0));
                        });
                });
            top += 66.0;
        }
        self.cleanup_old_notifications(TOAST_SECONDS);
        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

/// How far a toast of the given age has slid onto the screen, or `None`
/// once it has expired.
fn slide_fraction(age: f32) -> Option<f32> {
    let ease = |t: f32| {
        let t = t.clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    };
    if age >= TOAST_SECONDS {
        None
    } else if age < SLIDE_IN {
        Some(ease(age / SLIDE_IN))
    } else if age > TOAST_SECONDS - SLIDE_OUT {
        Some(ease((TOAST_SECONDS - age) / SLIDE_OUT))
    } else {
        Some(1.0)
    }
}

impl Default for NotificationHandler {
    fn default() -> Self {
        Self::new()
    }
}
