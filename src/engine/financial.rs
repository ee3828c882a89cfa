//! Financial and environmental metrics: investment, payback, ROI, IRR,
//! cash flows, CO2 and tree equivalents.

use serde::Serialize;

use crate::config::EngineConfig;

use super::billing::CostComparison;
use super::sizing::SystemSize;
use super::round2;

/// Newton-Raphson parameters for the IRR root-find. Changing any of these
/// changes observable output, so they are fixed and not configurable.
const IRR_GUESS: f64 = 0.10;
const IRR_TOLERANCE: f64 = 1e-6;
const IRR_MAX_ITERATIONS: u32 = 1000;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FinancialResult {
    pub investment: f64,
    pub annual_savings: f64,
    /// `None` when annual savings are zero or negative: the investment
    /// never pays back.
    pub payback_years: Option<f64>,
    pub roi_pct: f64,
    /// `None` when the root-find hits a zero derivative or runs out of
    /// iterations.
    pub irr_pct: Option<f64>,
    pub co2_saved_kg: f64,
    pub tree_equivalents: f64,
}

pub fn investment_cost(installed_kw: f64, cost_per_kw: f64) -> f64 {
    installed_kw * cost_per_kw
}

/// Years until cumulative savings equal the investment.
pub fn payback_years(investment: f64, annual_savings: f64) -> Option<f64> {
    if annual_savings > 0.0 {
        Some(investment / annual_savings)
    } else {
        None
    }
}

/// Total return over the system lifetime relative to the investment.
pub fn roi_pct(investment: f64, annual_savings: f64, lifetime_years: u32) -> f64 {
    let total_savings = annual_savings * lifetime_years as f64;
    ((total_savings - investment) / investment) * 100.0
}

/// Year 0 = -investment, then `years` entries of constant annual savings.
pub fn cashflow_list(investment: f64, annual_savings: f64, years: u32) -> Vec<f64> {
    let mut flows = Vec::with_capacity(years as usize + 1);
    flows.push(-investment);
    flows.extend(std::iter::repeat(annual_savings).take(years as usize));
    flows
}

/// Running sum of [`cashflow_list`].
pub fn cumulative_cashflow(investment: f64, annual_savings: f64, years: u32) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(years as usize + 1);
    let mut value = -investment;
    cumulative.push(value);
    for _ in 0..years {
        value += annual_savings;
        cumulative.push(value);
    }
    cumulative
}

/// Net present value of a cash-flow series at the given discount rate.
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(year, flow)| flow / (1.0 + rate).powi(year as i32))
        .sum()
}

/// Internal rate of return as a percentage, two decimals.
///
/// Newton-Raphson on NPV(rate) = 0. Returns `None` when the derivative
/// vanishes or the iteration cap is reached; both mean "no solution", not
/// an error.
pub fn irr_pct(cashflows: &[f64]) -> Option<f64> {
    let mut rate = IRR_GUESS;

    for _ in 0..IRR_MAX_ITERATIONS {
        let value = npv(cashflows, rate);
        let derivative: f64 = cashflows
            .iter()
            .enumerate()
            .map(|(year, flow)| -(year as f64) * flow / (1.0 + rate).powi(year as i32 + 1))
            .sum();

        if derivative == 0.0 {
            return None;
        }

        let next = rate - value / derivative;
        if (next - rate).abs() < IRR_TOLERANCE {
            return Some(round2(next * 100.0));
        }
        rate = next;
    }

    None
}

pub fn co2_saved_kg(annual_generation_kwh: f64, co2_per_kwh: f64) -> f64 {
    annual_generation_kwh * co2_per_kwh
}

/// Trees whose annual CO2 uptake matches the avoided emissions.
pub fn tree_equivalents(co2_kg: f64, tree_factor: f64) -> f64 {
    (co2_kg * tree_factor) / 10.0
}

/// Derives the full financial block from the sized system and the billing
/// comparison.
pub fn evaluate(cfg: &EngineConfig, system: &SystemSize, costs: &CostComparison) -> FinancialResult {
    let investment = investment_cost(system.installed_kw, cfg.cost_per_kw);
    let annual_savings = costs.annual_savings;

    let roi = if investment > 0.0 {
        roi_pct(investment, annual_savings, cfg.lifetime_years)
    } else {
        0.0
    };
    let cashflows = cashflow_list(investment, annual_savings, cfg.lifetime_years);
    let co2 = co2_saved_kg(system.annual_generation_kwh, cfg.co2_per_kwh);

    FinancialResult {
        investment,
        annual_savings,
        payback_years: payback_years(investment, annual_savings),
        roi_pct: roi,
        irr_pct: irr_pct(&cashflows),
        co2_saved_kg: co2,
        tree_equivalents: tree_equivalents(co2, cfg.tree_factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investment_cost() {
        assert!((investment_cost(2.44, 7500.0) - 18300.0).abs() < 1e-9);
    }

    #[test]
    fn test_payback_undefined_without_savings() {
        assert_eq!(payback_years(18300.0, 0.0), None);
        assert_eq!(payback_years(18300.0, -100.0), None);
        let payback = payback_years(18300.0, 3000.0).unwrap();
        assert!((payback - 6.1).abs() < 1e-9);
    }

    #[test]
    fn test_roi_over_lifetime() {
        // 3000/yr over 25 years on 18300: (75000 - 18300) / 18300.
        let roi = roi_pct(18300.0, 3000.0, 25);
        assert!((roi - 309.8360655737705).abs() < 1e-9);
    }

    #[test]
    fn test_cashflow_shapes() {
        let flows = cashflow_list(10000.0, 3000.0, 5);
        assert_eq!(flows, vec![-10000.0, 3000.0, 3000.0, 3000.0, 3000.0, 3000.0]);

        let cumulative = cumulative_cashflow(10000.0, 3000.0, 5);
        assert_eq!(
            cumulative,
            vec![-10000.0, -7000.0, -4000.0, -1000.0, 2000.0, 5000.0]
        );
    }

    #[test]
    fn test_irr_known_value() {
        // 5 years of 3000 on a 10000 investment.
        let flows = cashflow_list(10000.0, 3000.0, 5);
        let irr = irr_pct(&flows).unwrap();
        assert!((irr - 15.24).abs() < 1e-9);
        // The returned rate must be an NPV root (within 2-decimal rounding).
        assert!(npv(&flows, irr / 100.0).abs() < 5.0);
    }

    #[test]
    fn test_irr_no_solution_on_flat_flows() {
        // All-zero flows: derivative is zero on the first iteration.
        assert_eq!(irr_pct(&[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_irr_diverges_on_never_recovering_flows() {
        // Nothing ever comes back; no positive root exists.
        let flows = vec![-10000.0, -1.0, -1.0, -1.0];
        assert_eq!(irr_pct(&flows), None);
    }

    #[test]
    fn test_environmental_block() {
        let co2 = co2_saved_kg(3681.74, 0.5);
        assert!((co2 - 1840.87).abs() < 1e-9);
        let trees = tree_equivalents(co2, 0.8);
        assert!((trees - 147.2696).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_with_zero_sized_system() {
        let cfg = EngineConfig::default();
        let system = SystemSize {
            system_kw: 0.0,
            panel_count: 0,
            installed_kw: 0.0,
            area_m2: 0.0,
            annual_generation_kwh: 0.0,
            coverage_pct: 0.0,
        };
        let costs = CostComparison {
            cost_without_solar: 0.0,
            cost_with_solar: 0.0,
            annual_savings: 0.0,
        };
        let result = evaluate(&cfg, &system, &costs);
        assert_eq!(result.payback_years, None);
        assert_eq!(result.roi_pct, 0.0);
    }
}
