use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Prediction;
use crate::report::{PARAMETER_HEADER, VALUE_HEADER};

/// Two-column table of predicted concentrations, two decimals each.
pub fn prediction_table(ui: &mut Ui, prediction: &Prediction) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(170.0))
        .header(22.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong(PARAMETER_HEADER);
            });
            header.col(|ui: &mut Ui| {
                ui.strong(VALUE_HEADER);
            });
        })
        .body(|mut body| {
            for (label, value) in prediction.formatted_rows() {
                body.row(20.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(label);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.monospace(value);
                    });
                });
            }
        });
}
