use std::fs;

use serde::Serialize;

use crate::domain::errors::AppError;
use crate::domain::models::{MergedPoint, PricedChain};
use crate::utils::logging;

fn write_json<T: Serialize + ?Sized>(path: &str, value: &T) -> Result<(), AppError> {
    let body = serde_json::to_vec(value)?;
    fs::write(path, body).map_err(|e| AppError::io(path, e))?;
    logging::log_info(&format!("Wrote {}", path));
    Ok(())
}

/// Latest price per chain; overwritten on every report
pub fn write_prices(path: &str, prices: &[PricedChain]) -> Result<(), AppError> {
    write_json(path, prices)
}

/// Full merged series for the dashboard
pub fn write_series(path: &str, points: &[MergedPoint]) -> Result<(), AppError> {
    write_json(path, points)
}
