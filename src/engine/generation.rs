//! Generation simulation: month-by-month output from irradiance and
//! multi-year series with fluctuation or panel degradation.

use rand::Rng;

use crate::tables::MONTHS_PER_YEAR;

use super::EngineError;

/// Non-leap-year billing calendar.
const DAYS_IN_MONTH: [f64; MONTHS_PER_YEAR] = [
    31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0,
];

/// Expected generation per month from the department's irradiance row.
pub fn monthly_generation_from_irradiance(
    panel_count: u32,
    panel_power_kw: f64,
    efficiency: f64,
    monthly_irradiance: &[f64],
) -> Result<[f64; MONTHS_PER_YEAR], EngineError> {
    if monthly_irradiance.len() != MONTHS_PER_YEAR {
        return Err(EngineError::LengthMismatch {
            expected: MONTHS_PER_YEAR,
            got: monthly_irradiance.len(),
        });
    }

    let mut generation = [0.0; MONTHS_PER_YEAR];
    for (month, irradiance) in monthly_irradiance.iter().enumerate() {
        generation[month] = panel_count as f64
            * panel_power_kw
            * irradiance
            * efficiency
            * DAYS_IN_MONTH[month];
    }
    Ok(generation)
}

/// Per-year values with independent uniform fluctuation in ±`variation`.
///
/// Unlike the monthly distribution this is not normalized to any total:
/// years fluctuate independently, there is no fixed budget to keep.
pub fn annual_series_with_variation<R: Rng>(
    rng: &mut R,
    base_value: f64,
    years: u32,
    variation: f64,
) -> Vec<f64> {
    (0..years)
        .map(|_| base_value * (1.0 + rng.gen_range(-variation..=variation)))
        .collect()
}

/// Deterministic geometric output decline over the system lifetime.
///
/// Year 0 equals `base_value` exactly; the series never increases.
pub fn annual_series_with_degradation(
    base_value: f64,
    years: u32,
    degradation_rate: f64,
) -> Vec<f64> {
    (0..years)
        .map(|year| base_value * (1.0 - degradation_rate).powi(year as i32))
        .collect()
}
