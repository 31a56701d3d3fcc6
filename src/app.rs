use std::sync::Arc;

use eframe::egui;

use crate::context::ModelContext;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WaterQualityApp {
    pub state: AppState,
}

impl WaterQualityApp {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self {
            state: AppState::new(context),
        }
    }
}

impl eframe::App for WaterQualityApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: form, results, interpretation ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });
    }
}
