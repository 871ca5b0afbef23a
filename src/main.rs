mod app;
mod color;
mod data;
mod state;
mod ui;

use app::PredboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 900.0])
            .with_min_inner_size([600.0, 400.0])
            .with_icon(app_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Predictions Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(PredboardApp::default()))),
    )
}

/// 16×16 bar-chart glyph used as the window icon (no bitmap assets shipped).
fn app_icon() -> egui::IconData {
    const SIZE: usize = 16;
    // Three bars with heights in pixels, left to right.
    const BARS: [(usize, usize, [u8; 3]); 3] = [
        (2, 6, [96, 165, 250]),
        (7, 10, [59, 130, 246]),
        (12, 14, [37, 99, 235]),
    ];

    let mut rgba = vec![0u8; SIZE * SIZE * 4];
    for &(x0, height, color) in &BARS {
        for x in x0..x0 + 3 {
            for y in (SIZE - height)..SIZE {
                let i = (y * SIZE + x) * 4;
                rgba[i..i + 3].copy_from_slice(&color);
                rgba[i + 3] = 255;
            }
        }
    }

    egui::IconData {
        rgba,
        width: SIZE as u32,
        height: SIZE as u32,
    }
}
