use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::pollutant_color;
use crate::data::model::Prediction;

// ---------------------------------------------------------------------------
// Prediction bar chart
// ---------------------------------------------------------------------------

/// One bar per pollutant, in output order.
pub fn prediction_chart(ui: &mut Ui, prediction: &Prediction) {
    Plot::new("prediction_chart")
        .legend(Legend::default())
        .height(220.0)
        .y_axis_label("mg/L")
        .show_x(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (idx, (pollutant, value)) in prediction.iter().enumerate() {
                let color = pollutant_color(pollutant);
                let bar = Bar::new(idx as f64, value)
                    .name(pollutant.label())
                    .fill(color);
                let chart = BarChart::new(vec![bar])
                    .name(pollutant.label())
                    .color(color)
                    .width(0.7);
                plot_ui.bar_chart(chart);
            }
        });
}
