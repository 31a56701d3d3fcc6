use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::interpretation::{INTERPRETATION_HEADING, PARAMETER_NOTES, SCORING_DISCLAIMER};
use crate::state::{AppState, MAX_YEAR, MIN_YEAR};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Central panel – input form and results
// ---------------------------------------------------------------------------

/// Render the main page: form, prediction and interpretation notes.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Water Quality Prediction");
            ui.label(
                "This model predicts the water quality based on the following parameters: \
                 Year and Station ID.",
            );
            ui.add_space(8.0);

            input_form(ui, state);

            if let Some(warning) = &state.warning {
                ui.add_space(4.0);
                ui.label(RichText::new(warning).color(Color32::from_rgb(230, 180, 40)));
            }

            let Some(prediction) = &state.prediction else {
                return;
            };

            ui.add_space(12.0);
            ui.heading(prediction.title());
            ui.add_space(4.0);
            table::prediction_table(ui, prediction);
            ui.add_space(8.0);
            plot::prediction_chart(ui, prediction);

            ui.separator();
            interpretation(ui);
        });
}

fn input_form(ui: &mut Ui, state: &mut AppState) {
    let mut submitted = false;

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Year");
        cols[0]
            .add(
                egui::DragValue::new(&mut state.year)
                    .range(MIN_YEAR..=MAX_YEAR)
                    .speed(0.2),
            )
            .on_hover_text("Select the year for prediction.");

        cols[1].strong("Station ID");
        let response = cols[1]
            .add(egui::TextEdit::singleline(&mut state.station_input).hint_text("e.g. 1"))
            .on_hover_text("Enter the station ID 1-22.");
        if response.lost_focus() && cols[1].input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
        }
    });

    ui.add_space(6.0);
    if ui.button("Predict").clicked() {
        submitted = true;
    }

    if submitted {
        state.submit();
    }
}

fn interpretation(ui: &mut Ui) {
    ui.strong(INTERPRETATION_HEADING);
    ui.add_space(4.0);
    for note in &PARAMETER_NOTES {
        ui.label(RichText::new(note.heading()).strong());
        ui.label(note.meaning);
        ui.label(RichText::new(format!("Typical Acceptable Limit: {}", note.limit)).italics());
        ui.add_space(4.0);
    }
    ui.separator();
    ui.label(RichText::new(SCORING_DISCLAIMER).color(Color32::LIGHT_BLUE));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let can_export = state.prediction.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export prediction as CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} features, {} stations",
            state.context.schema().len(),
            state.context.known_stations().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let Some(prediction) = &state.prediction else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export prediction")
        .set_file_name(format!(
            "prediction_station_{}_{}.csv",
            prediction.station_id, prediction.year
        ))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::report::export_csv(prediction, &path) {
            Ok(()) => {
                log::info!("Exported prediction to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export prediction: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
