#[test]
fn gui_config_defaults() {
    let config = graph_gui::GuiConfig::default();
    assert_eq!(config.title, "Graph Service");
    assert_eq!(config.width, 1280.0);
    assert_eq!(config.height, 720.0);
    assert!(config.position.is_none());
}
