//! Tariff billing: monthly bill arithmetic and the annual with/without
//! solar cost comparison under no-export net metering.

use serde::Serialize;

use crate::tables::{Tariff, MONTHS_PER_YEAR};

use super::EngineError;

/// Annual cost with and without the solar offset.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CostComparison {
    pub cost_without_solar: f64,
    pub cost_with_solar: f64,
    /// May be negative: fixed charges can outweigh the volumetric saving.
    pub annual_savings: f64,
}

/// Total for one monthly bill.
///
/// Fixed charge plus volumetric cost, then the municipal surcharge, then
/// tax, each compounding on the previous subtotal.
pub fn monthly_bill(consumption_kwh: f64, tariff: &Tariff, tax_rate: f64) -> f64 {
    let subtotal = tariff.fixed_charge + consumption_kwh * tariff.price_per_kwh;
    subtotal * (1.0 + tariff.municipality_fee) * (1.0 + tax_rate)
}

/// Sums twelve monthly bills with and without the solar offset.
///
/// Net metering here carries no export credit: a month's generation only
/// offsets that same month's consumption, floored at zero. Savings are not
/// clamped; a tariff dominated by fixed charges can make them negative.
pub fn annual_cost_comparison(
    monthly_consumption: &[f64],
    monthly_generation: &[f64],
    tariff: &Tariff,
    tax_rate: f64,
) -> Result<CostComparison, EngineError> {
    for series in [monthly_consumption, monthly_generation] {
        if series.len() != MONTHS_PER_YEAR {
            return Err(EngineError::LengthMismatch {
                expected: MONTHS_PER_YEAR,
                got: series.len(),
            });
        }
    }

    let cost_without_solar: f64 = monthly_consumption
        .iter()
        .map(|kwh| monthly_bill(*kwh, tariff, tax_rate))
        .sum();

    let cost_with_solar: f64 = monthly_consumption
        .iter()
        .zip(monthly_generation)
        .map(|(consumed, generated)| {
            let net_kwh = (consumed - generated).max(0.0);
            monthly_bill(net_kwh, tariff, tax_rate)
        })
        .sum();

    Ok(CostComparison {
        cost_without_solar,
        cost_with_solar,
        annual_savings: cost_without_solar - cost_with_solar,
    })
}
