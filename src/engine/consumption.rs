//! Consumption normalization: raw bills or meter readings into average,
//! annual and simulated monthly figures.

use rand::Rng;

use crate::tables::MONTHS_PER_YEAR;

use super::EngineError;

/// Converts one currency bill into kWh at the given volumetric price.
pub fn monthly_kwh_from_bill(bill: f64, price_per_kwh: f64) -> Result<f64, EngineError> {
    if price_per_kwh <= 0.0 {
        return Err(EngineError::NonPositive {
            field: "price_per_kwh",
            value: price_per_kwh,
        });
    }
    Ok(bill / price_per_kwh)
}

/// Arithmetic mean of the observed months.
pub fn average(samples: &[f64]) -> Result<f64, EngineError> {
    if samples.is_empty() {
        return Err(EngineError::EmptyConsumption);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

pub fn annual_from_average(avg_monthly: f64) -> f64 {
    avg_monthly * MONTHS_PER_YEAR as f64
}

/// Splits an annual total into 12 randomized months that sum back to it.
///
/// Each month starts at the annual mean, gets an independent uniform
/// perturbation in ±`variation`, and the whole row is then rescaled so the
/// sum equals `annual_total` regardless of the draws.
pub fn simulate_monthly_distribution<R: Rng>(
    rng: &mut R,
    annual_total: f64,
    variation: f64,
) -> [f64; MONTHS_PER_YEAR] {
    let base = annual_total / MONTHS_PER_YEAR as f64;
    let mut months = [0.0; MONTHS_PER_YEAR];
    for month in months.iter_mut() {
        *month = base * (1.0 + rng.gen_range(-variation..=variation));
    }

    let total: f64 = months.iter().sum();
    if total > 0.0 {
        let scale = annual_total / total;
        for month in months.iter_mut() {
            *month *= scale;
        }
    }
    months
}
