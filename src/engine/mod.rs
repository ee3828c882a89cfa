//! # Solar Estimation Engine
//!
//! Pure, synchronous calculation pipeline:
//!
//! consumption history -> normalization -> system sizing -> generation
//! simulation -> tariff billing -> financial metrics.
//!
//! Every function here is stateless and side-effect free; the only source
//! of non-determinism is the caller-supplied random generator used by the
//! monthly-distribution and year-variation simulators, so tests can seed it.

pub mod billing;
pub mod consumption;
pub mod financial;
pub mod generation;
pub mod sizing;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::tables::{IrradianceTable, PricingTable, TableError, MONTHS_PER_YEAR};

use billing::CostComparison;
use financial::FinancialResult;
use sizing::{SizingPreference, SystemSize};

/// Recoverable calculation failures.
///
/// All variants are local conditions the caller can render per field;
/// nothing in the engine is fatal to the process.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("consumption history is empty")]
    EmptyConsumption,

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("expected {expected} monthly values, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Lookup(#[from] TableError),
}

/// Consumption history, either as currency bills or as metered kWh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionInput {
    /// Monthly electricity bills in local currency; converted to kWh at
    /// the looked-up volumetric price.
    Bills(Vec<f64>),
    /// Metered monthly consumption in kWh.
    MonthlyKwh(Vec<f64>),
}

/// Complete input bundle for one estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub consumption: ConsumptionInput,
    pub distributor: String,
    pub rate_class: String,
    pub department: String,
    #[serde(default)]
    pub preference: SizingPreference,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsumptionSummary {
    pub avg_monthly_kwh: f64,
    pub annual_kwh: f64,
}

/// Simulated monthly and lifetime series backing the estimate.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSeries {
    /// Randomized 12-month split of annual consumption; sums to the annual
    /// figure.
    pub monthly_consumption_kwh: [f64; MONTHS_PER_YEAR],
    /// Deterministic 12-month generation from the department's irradiance.
    pub monthly_generation_kwh: [f64; MONTHS_PER_YEAR],
    /// Per-year consumption over the system lifetime, with fluctuation.
    pub annual_consumption_kwh: Vec<f64>,
    /// Per-year generation over the system lifetime, with fluctuation.
    pub annual_generation_kwh: Vec<f64>,
    /// Per-year generation with deterministic panel degradation.
    pub degraded_generation_kwh: Vec<f64>,
    /// Year 0 = -investment, then one entry of annual savings per year.
    pub cashflow: Vec<f64>,
    /// Running sum of `cashflow`.
    pub cumulative_cashflow: Vec<f64>,
}

/// Result bundle returned to callers; the engine's whole contract.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub consumption: ConsumptionSummary,
    pub system: SystemSize,
    pub series: SimulationSeries,
    pub costs: CostComparison,
    pub financial: FinancialResult,
}

/// Runs the full estimation pipeline over one request.
///
/// The tables are read-only lookups; `rng` drives only the simulated
/// distributions, never the sizing or billing arithmetic.
pub fn estimate<R: Rng>(
    cfg: &EngineConfig,
    pricing: &PricingTable,
    irradiance: &IrradianceTable,
    request: &EstimateRequest,
    rng: &mut R,
) -> Result<Estimate, EngineError> {
    let tariff = pricing.tariff(&request.distributor, &request.rate_class, &request.department)?;
    let monthly_irradiance = irradiance.monthly(&request.department)?;
    let annual_irradiance =
        monthly_irradiance.iter().sum::<f64>() / monthly_irradiance.len() as f64;

    let monthly_kwh = match &request.consumption {
        ConsumptionInput::MonthlyKwh(values) => values.clone(),
        ConsumptionInput::Bills(bills) => bills
            .iter()
            .map(|bill| consumption::monthly_kwh_from_bill(*bill, tariff.price_per_kwh))
            .collect::<Result<_, _>>()?,
    };

    let avg_monthly_kwh = consumption::average(&monthly_kwh)?;
    let annual_kwh = consumption::annual_from_average(avg_monthly_kwh);

    let system = sizing::size_system(cfg, avg_monthly_kwh, annual_irradiance, request.preference)?;

    let monthly_consumption =
        consumption::simulate_monthly_distribution(rng, annual_kwh, cfg.monthly_variation);
    let monthly_generation = generation::monthly_generation_from_irradiance(
        system.panel_count,
        cfg.panel_power_kw,
        cfg.system_efficiency,
        monthly_irradiance,
    )?;

    let costs =
        billing::annual_cost_comparison(&monthly_consumption, &monthly_generation, &tariff, cfg.tax_rate)?;

    let financial = financial::evaluate(cfg, &system, &costs);

    let years = cfg.lifetime_years;
    let series = SimulationSeries {
        monthly_consumption_kwh: monthly_consumption,
        monthly_generation_kwh: monthly_generation,
        annual_consumption_kwh: generation::annual_series_with_variation(
            rng,
            annual_kwh,
            years,
            cfg.annual_variation,
        ),
        annual_generation_kwh: generation::annual_series_with_variation(
            rng,
            system.annual_generation_kwh,
            years,
            cfg.annual_variation,
        ),
        degraded_generation_kwh: generation::annual_series_with_degradation(
            system.annual_generation_kwh,
            years,
            cfg.degradation_rate,
        ),
        cashflow: financial::cashflow_list(financial.investment, financial.annual_savings, years),
        cumulative_cashflow: financial::cumulative_cashflow(
            financial.investment,
            financial.annual_savings,
            years,
        ),
    };

    Ok(Estimate {
        consumption: ConsumptionSummary {
            avg_monthly_kwh,
            annual_kwh,
        },
        system,
        series,
        costs,
        financial,
    })
}

/// Rounds to two decimals, matching the precision quoted to users.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn tables() -> (PricingTable, IrradianceTable) {
        let pricing = serde_json::from_value(json!({
            "EEGSA": {
                "BTS": {
                    "Guatemala": {
                        "pricePerKwh": 1.8,
                        "fixedCharge": 20.0,
                        "municipalityFee": 0.05
                    }
                }
            }
        }))
        .unwrap();
        let irradiance: IrradianceTable =
            serde_json::from_value(json!({ "Guatemala": vec![5.3; 12] })).unwrap();
        irradiance.validate().unwrap();
        (pricing, irradiance)
    }

    fn request() -> EstimateRequest {
        EstimateRequest {
            consumption: ConsumptionInput::MonthlyKwh(vec![250.0, 255.0, 245.0, 252.0]),
            distributor: "EEGSA".to_string(),
            rate_class: "BTS".to_string(),
            department: "Guatemala".to_string(),
            preference: SizingPreference::Balanced,
        }
    }

    #[test]
    fn test_estimate_bundle_is_internally_consistent() {
        let cfg = EngineConfig::default();
        let (pricing, irradiance) = tables();
        let mut rng = StdRng::seed_from_u64(7);

        let estimate = estimate(&cfg, &pricing, &irradiance, &request(), &mut rng).unwrap();

        // Installed capacity never under-covers the computed size.
        assert!(estimate.system.installed_kw >= estimate.system.system_kw);
        // Investment follows directly from installed capacity.
        assert!(
            (estimate.financial.investment
                - estimate.system.installed_kw * cfg.cost_per_kw)
                .abs()
                < 1e-9
        );
        // Simulated consumption keeps the annual budget.
        let simulated: f64 = estimate.series.monthly_consumption_kwh.iter().sum();
        assert!((simulated - estimate.consumption.annual_kwh).abs() < 1e-2);
        // Lifetime series all cover the configured horizon.
        assert_eq!(estimate.series.cashflow.len(), cfg.lifetime_years as usize + 1);
        assert_eq!(
            estimate.series.degraded_generation_kwh.len(),
            cfg.lifetime_years as usize
        );
    }

    #[test]
    fn test_estimate_surfaces_missing_tariff() {
        let cfg = EngineConfig::default();
        let (pricing, irradiance) = tables();
        let mut rng = StdRng::seed_from_u64(7);
        let mut req = request();
        req.distributor = "UNKNOWN".to_string();

        let err = estimate(&cfg, &pricing, &irradiance, &req, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Lookup(TableError::TariffNotFound { .. })
        ));
    }

    #[test]
    fn test_estimate_rejects_empty_history() {
        let cfg = EngineConfig::default();
        let (pricing, irradiance) = tables();
        let mut rng = StdRng::seed_from_u64(7);
        let mut req = request();
        req.consumption = ConsumptionInput::MonthlyKwh(vec![]);

        let err = estimate(&cfg, &pricing, &irradiance, &req, &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::EmptyConsumption));
    }
}
