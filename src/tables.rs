//! Tariff and irradiance lookup tables.
//!
//! Both tables are loaded once by the caller (binary, test harness) and
//! handed to the engine as plain immutable data. The engine never reads
//! files itself; it only performs typed lookups against these structures.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Months in the fixed billing calendar.
pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no tariff for distributor '{distributor}', rate class '{rate_class}', department '{department}'")]
    TariffNotFound {
        distributor: String,
        rate_class: String,
        department: String,
    },

    #[error("no irradiance data for department '{department}'")]
    IrradianceNotFound { department: String },

    #[error("irradiance for department '{department}' must have {MONTHS_PER_YEAR} monthly values, got {got}")]
    IrradianceLength { department: String, got: usize },

    #[error("irradiance for department '{department}' contains non-positive value {value}")]
    IrradianceNonPositive { department: String, value: f64 },
}

/// One distributor/rate-class/department tariff entry.
///
/// Field names mirror the upstream regulator feed, which is camelCase JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    /// Volumetric price per kWh.
    pub price_per_kwh: f64,
    /// Fixed monthly charge.
    pub fixed_charge: f64,
    /// Municipal surcharge as a fraction of the subtotal.
    pub municipality_fee: f64,
}

/// distributor -> rate class -> department -> tariff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable(BTreeMap<String, BTreeMap<String, BTreeMap<String, Tariff>>>);

impl PricingTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading pricing table {}", path.display()))?;
        let table: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing pricing table {}", path.display()))?;
        Ok(table)
    }

    /// Full tariff entry for a distributor/rate-class/department key.
    ///
    /// A missing key is a [`TableError::TariffNotFound`], never a default
    /// tariff: a silently zeroed bill would corrupt every savings figure
    /// computed downstream.
    pub fn tariff(
        &self,
        distributor: &str,
        rate_class: &str,
        department: &str,
    ) -> Result<Tariff, TableError> {
        self.0
            .get(distributor)
            .and_then(|classes| classes.get(rate_class))
            .and_then(|departments| departments.get(department))
            .copied()
            .ok_or_else(|| TableError::TariffNotFound {
                distributor: distributor.to_string(),
                rate_class: rate_class.to_string(),
                department: department.to_string(),
            })
    }

    pub fn distributors(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn rate_classes(&self, distributor: &str) -> Vec<&str> {
        self.0
            .get(distributor)
            .map(|classes| classes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// department -> 12 mean daily irradiance values (kWh/m²/day).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IrradianceTable(BTreeMap<String, Vec<f64>>);

impl IrradianceTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading irradiance table {}", path.display()))?;
        let table: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing irradiance table {}", path.display()))?;
        table.validate()?;
        Ok(table)
    }

    /// Checks every row has exactly 12 positive monthly values.
    pub fn validate(&self) -> Result<(), TableError> {
        for (department, months) in &self.0 {
            if months.len() != MONTHS_PER_YEAR {
                return Err(TableError::IrradianceLength {
                    department: department.clone(),
                    got: months.len(),
                });
            }
            if let Some(&value) = months.iter().find(|v| **v <= 0.0) {
                return Err(TableError::IrradianceNonPositive {
                    department: department.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Monthly irradiance row for a department.
    pub fn monthly(&self, department: &str) -> Result<&[f64], TableError> {
        self.0
            .get(department)
            .map(Vec::as_slice)
            .ok_or_else(|| TableError::IrradianceNotFound {
                department: department.to_string(),
            })
    }

    /// Annual mean daily irradiance, derived from the monthly row.
    pub fn annual_mean(&self, department: &str) -> Result<f64, TableError> {
        let months = self.monthly(department)?;
        Ok(months.iter().sum::<f64>() / months.len() as f64)
    }

    pub fn departments(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}
