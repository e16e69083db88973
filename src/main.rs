use eframe::NativeOptions;
use mendel::ui::MendelApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Mendel - Evolution Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Mendel",
        native_options,
        Box::new(|cc| Ok(Box::new(MendelApp::new(cc)))),
    )
}
