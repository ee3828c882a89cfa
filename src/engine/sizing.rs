//! System sizing: consumption plus irradiance into panel count, installed
//! capacity, footprint and expected annual generation.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::tables::MONTHS_PER_YEAR;

use super::{round2, EngineError};

/// User-chosen bias on the computed system capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingPreference {
    Minimum,
    #[default]
    Balanced,
    Maximum,
}

impl SizingPreference {
    /// Multiplier applied to the base size before panel rounding.
    pub fn bias(self) -> f64 {
        match self {
            SizingPreference::Minimum => 0.8,
            SizingPreference::Balanced => 1.0,
            SizingPreference::Maximum => 1.2,
        }
    }
}

/// Sized system description.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SystemSize {
    /// Target capacity after the preference bias, before panel rounding.
    pub system_kw: f64,
    pub panel_count: u32,
    /// Capacity of the rounded-up panel count; always >= `system_kw`.
    pub installed_kw: f64,
    pub area_m2: f64,
    pub annual_generation_kwh: f64,
    pub coverage_pct: f64,
}

/// Capacity needed to cover the annual demand at the given irradiance.
///
/// Annual energy demand divided by the annual energy one installed kW
/// harvests at that irradiance after derating.
pub fn required_size_kw(
    avg_monthly_kwh: f64,
    annual_irradiance: f64,
    efficiency: f64,
) -> Result<f64, EngineError> {
    if annual_irradiance <= 0.0 {
        return Err(EngineError::NonPositive {
            field: "annual_irradiance",
            value: annual_irradiance,
        });
    }
    if efficiency <= 0.0 {
        return Err(EngineError::NonPositive {
            field: "efficiency",
            value: efficiency,
        });
    }
    Ok((avg_monthly_kwh * MONTHS_PER_YEAR as f64) / (annual_irradiance * 365.0 * efficiency))
}

/// Panels needed for the target capacity, always rounded up.
pub fn panel_count(size_kw: f64, panel_power_kw: f64) -> Result<u32, EngineError> {
    if panel_power_kw <= 0.0 {
        return Err(EngineError::NonPositive {
            field: "panel_power_kw",
            value: panel_power_kw,
        });
    }
    Ok((size_kw / panel_power_kw).ceil() as u32)
}

pub fn installed_kw(panel_count: u32, panel_power_kw: f64) -> f64 {
    panel_count as f64 * panel_power_kw
}

pub fn area_m2(panel_count: u32, panel_area_m2: f64) -> f64 {
    panel_count as f64 * panel_area_m2
}

pub fn annual_generation_kwh(
    panel_count: u32,
    panel_power_kw: f64,
    efficiency: f64,
    annual_irradiance: f64,
) -> f64 {
    panel_count as f64 * panel_power_kw * efficiency * annual_irradiance * 365.0
}

/// Share of annual consumption the system covers, as a percentage.
///
/// Balanced sizing reports at most 100%: it targets matching consumption,
/// not exceeding it. Minimum and Maximum pass the raw figure through.
pub fn coverage_pct(
    annual_generation_kwh: f64,
    avg_monthly_kwh: f64,
    preference: SizingPreference,
) -> f64 {
    let annual_kwh = avg_monthly_kwh * MONTHS_PER_YEAR as f64;
    if annual_kwh <= 0.0 {
        return 0.0;
    }
    let raw = annual_generation_kwh / annual_kwh * 100.0;
    let coverage = match preference {
        SizingPreference::Balanced => raw.min(100.0),
        SizingPreference::Minimum | SizingPreference::Maximum => raw,
    };
    round2(coverage)
}

/// Full sizing chain for one request.
pub fn size_system(
    cfg: &EngineConfig,
    avg_monthly_kwh: f64,
    annual_irradiance: f64,
    preference: SizingPreference,
) -> Result<SystemSize, EngineError> {
    let system_kw =
        required_size_kw(avg_monthly_kwh, annual_irradiance, cfg.system_efficiency)?
            * preference.bias();
    let panels = panel_count(system_kw, cfg.panel_power_kw)?;
    let annual_generation = annual_generation_kwh(
        panels,
        cfg.panel_power_kw,
        cfg.system_efficiency,
        annual_irradiance,
    );

    Ok(SystemSize {
        system_kw,
        panel_count: panels,
        installed_kw: installed_kw(panels, cfg.panel_power_kw),
        area_m2: area_m2(panels, cfg.panel_area_m2),
        annual_generation_kwh: annual_generation,
        coverage_pct: coverage_pct(annual_generation, avg_monthly_kwh, preference),
    })
}
