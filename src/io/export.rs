//! Export fit results.
//!
//! Residual rows go to CSV (spreadsheet friendly); the fitted model can be
//! rendered as JSON for downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{FittedModel, IntegralResult, ResidualRow};
use crate::error::AppError;

/// Write residual rows (`x,y_obs,y_fit,residual`) to a CSV file.
pub fn write_residuals_csv(path: &Path, rows: &[ResidualRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_residuals(file, rows)
}

/// Write residual rows to any sink.
pub fn write_residuals<W: Write>(sink: W, rows: &[ResidualRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// JSON document for `--json` output.
#[derive(Debug, Serialize)]
pub struct FitDocument<'a> {
    pub model: &'a FittedModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integral: Option<IntegralResult>,
}

/// Render the fitted model (and optional integral) as pretty JSON.
pub fn fit_to_json(model: &FittedModel, integral: Option<IntegralResult>) -> Result<String, AppError> {
    serde_json::to_string_pretty(&FitDocument { model, integral })
        .map_err(|e| AppError::input(format!("Failed to serialize fit to JSON: {e}")))
}
