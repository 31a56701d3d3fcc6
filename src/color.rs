use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Pollutant;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colour per pollutant, so bars keep their colour across predictions.
pub fn pollutant_color(pollutant: Pollutant) -> Color32 {
    let palette = generate_palette(Pollutant::ALL.len());
    Pollutant::ALL
        .iter()
        .position(|p| *p == pollutant)
        .and_then(|i| palette.get(i).copied())
        .unwrap_or(Color32::GRAY)
}
