use anyhow::Result;
use axum::Router;
use solar_estimator::{api, config::Config, tables, telemetry};
use tables::{IrradianceTable, PricingTable};
use telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let pricing = PricingTable::load(&cfg.data.pricing)?;
    let irradiance = IrradianceTable::load(&cfg.data.irradiance)?;
    info!(
        distributors = pricing.distributors().len(),
        departments = irradiance.departments().len(),
        "tariff and irradiance tables loaded"
    );

    let state = api::AppState::new(&cfg, pricing, irradiance);
    let app: Router = api::router(state, &cfg);

    let addr = cfg.server.socket_addr()?;
    info!(%addr, "starting solar estimator service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}
