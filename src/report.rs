use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::Prediction;
use crate::interpretation::{INTERPRETATION_HEADING, PARAMETER_NOTES, SCORING_DISCLAIMER};

pub const PARAMETER_HEADER: &str = "Parameter";
pub const VALUE_HEADER: &str = "Predicted Value (mg/L)";

// ---------------------------------------------------------------------------
// Plain-text rendering (headless mode)
// ---------------------------------------------------------------------------

/// Render the prediction as an aligned two-column table.
pub fn render_table(prediction: &Prediction) -> String {
    let rows = prediction.formatted_rows();
    let left = rows
        .iter()
        .map(|(label, _)| label.len())
        .chain(std::iter::once(PARAMETER_HEADER.len()))
        .max()
        .unwrap_or_default();
    let right = rows
        .iter()
        .map(|(_, value)| value.len())
        .chain(std::iter::once(VALUE_HEADER.len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!("{PARAMETER_HEADER:<left$}  {VALUE_HEADER:>right$}\n"));
    out.push_str(&format!("{}  {}\n", "-".repeat(left), "-".repeat(right)));
    for (label, value) in rows {
        out.push_str(&format!("{label:<left$}  {value:>right$}\n"));
    }
    out
}

/// Full console report: heading, table and interpretation notes.
pub fn render_report(prediction: &Prediction) -> String {
    let mut out = format!("{}\n\n", prediction.title());
    out.push_str(&render_table(prediction));
    out.push('\n');
    out.push_str(INTERPRETATION_HEADING);
    out.push('\n');
    for note in &PARAMETER_NOTES {
        out.push_str(&format!(
            "  * {}: {}\n    (Typical Acceptable Limit: {})\n",
            note.heading(),
            note.meaning,
            note.limit
        ));
    }
    out.push('\n');
    out.push_str(SCORING_DISCLAIMER);
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the prediction table as CSV to any writer.
pub fn write_csv<W: Write>(prediction: &Prediction, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([PARAMETER_HEADER, VALUE_HEADER])
        .context("writing CSV header")?;
    for (label, value) in prediction.formatted_rows() {
        wtr.write_record([label, value.as_str()])
            .with_context(|| format!("writing CSV row {label}"))?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Export the prediction table to a CSV file.
pub fn export_csv(prediction: &Prediction, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(prediction, file)
}
