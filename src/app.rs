use eframe::egui;

use crate::state::AppState;
use crate::ui::sections;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PredboardApp {
    pub state: AppState,
}

impl eframe::App for PredboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut refresh_requested = false;

        let AppState {
            data_dir,
            load_options,
            cache,
            widgets,
        } = &mut self.state;
        let outcome = cache.get_or_load(data_dir, load_options);

        // ---- Top panel: source info + refresh ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            sections::top_bar(ui, outcome, &mut refresh_requested);
        });

        // ---- Central panel: the dashboard sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    sections::dashboard(ui, outcome, widgets);
                });
        });

        if refresh_requested {
            self.state.refresh();
        }
    }
}
