use eframe::egui;
use finviewer::app::FinViewerApp;
use finviewer::config::Config;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; falling back to defaults");
            Config::default()
        }
    };
    match (&config.api_url, &config.data_file) {
        (Some(url), _) => log::info!("Records source: {url}"),
        (None, Some(path)) => log::info!("Records source: {}", path.display()),
        (None, None) => log::info!("No records source configured; use File → Open…"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FinViewer – Financial Statements",
        options,
        Box::new(|_cc| Ok(Box::new(FinViewerApp::new(config)))),
    )
}
