use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub enable_cors: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Paths of the externally maintained lookup tables.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub pricing: String,
    pub irradiance: String,
}

/// Physical and financial coefficients injected into the calculation engine.
///
/// None of these are hardcoded in the engine itself; the defaults here match
/// the catalog panel (0.61 kW, 2.7 m²) and the Guatemalan market assumptions
/// the tariff tables were built against.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rated power of one panel in kW.
    pub panel_power_kw: f64,
    /// Derating factor for inverter/wiring/soiling losses.
    pub system_efficiency: f64,
    /// Footprint of one panel in m².
    pub panel_area_m2: f64,
    /// CO2 avoided per generated kWh, in kg.
    pub co2_per_kwh: f64,
    /// Trees offset per 10 kg of CO2 avoided.
    pub tree_factor: f64,
    /// Value-added tax applied on top of the municipal surcharge.
    pub tax_rate: f64,
    /// Expected system lifetime in years.
    pub lifetime_years: u32,
    /// Installed cost per kW, in local currency.
    pub cost_per_kw: f64,
    /// Max relative month-to-month spread of the simulated distribution.
    pub monthly_variation: f64,
    /// Max relative year-to-year fluctuation of the simulated series.
    pub annual_variation: f64,
    /// Annual panel output decline, as a fraction.
    pub degradation_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            panel_power_kw: 0.61,
            system_efficiency: 0.78,
            panel_area_m2: 2.7,
            co2_per_kwh: 0.5,
            tree_factor: 0.8,
            tax_rate: 0.12,
            lifetime_years: 25,
            cost_per_kw: 7500.0,
            monthly_variation: 0.05,
            annual_variation: 0.05,
            degradation_rate: 0.004,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SOLAR__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_config_is_sane() {
        let cfg = EngineConfig::default();
        assert!(cfg.panel_power_kw > 0.0);
        assert!(cfg.system_efficiency > 0.0 && cfg.system_efficiency <= 1.0);
        assert!(cfg.lifetime_years > 0);
        assert!(cfg.degradation_rate < 1.0);
    }

    #[test]
    fn test_socket_addr_parses() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: false,
            request_timeout_secs: 10,
        };
        assert_eq!(server.socket_addr().unwrap().port(), 8080);
    }
}
