use eframe::egui;
use lcview::app::EnergyApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 760.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LCView – Energy Flows",
        options,
        Box::new(|_cc| Ok(Box::new(EnergyApp::default()))),
    )
}
