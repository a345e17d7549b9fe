mod app;

use app::ViewerApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "latticeview_gui=info".into()),
        )
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("latticeview — grid & zoom demo")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "latticeview-gui",
        native_options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
