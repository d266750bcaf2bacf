//! # miheaterd — miheater daemon
//!
//! Composition root that wires the heater integration to a transport and
//! runs the poll loop.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize tracing
//! - Construct the transport and the integration
//! - Run setup, then poll state on the configured interval
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.
//!
//! This repository ships no production MiOT transport; the daemon drives
//! the simulated device from `miheater-adapter-virtual`. A real
//! transport plugs into the same `MiotClient` port.

mod config;

use anyhow::Context;
use miheater_adapter_miot::{HeaterIntegration, models};
use miheater_adapter_virtual::VirtualHeater;
use miheater_app::ports::integration::Integration;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    let model = config
        .device
        .model
        .clone()
        .unwrap_or_else(|| models::MODEL_ZA2.to_string());
    let profile = models::lookup(&model)
        .with_context(|| format!("unknown heater model {model:?}"))?;

    let client = VirtualHeater::new(&profile);
    let mut integration = HeaterIntegration::new(config.heater(), client);

    let discovered = integration
        .setup()
        .await
        .context("heater integration setup failed")?;
    for dd in &discovered {
        tracing::info!(
            device = %dd.device.name,
            model = dd.device.model.as_deref().unwrap_or("unknown"),
            entities = dd.entities.len(),
            "device ready"
        );
        for entity in &dd.entities {
            tracing::info!(entity = %entity.entity_id, state = %entity.state, "entity published");
        }
    }

    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => match integration.poll().await {
                Ok(entities) => {
                    for entity in &entities {
                        tracing::debug!(entity = %entity.entity_id, state = %entity.state, "poll");
                    }
                }
                Err(err) => tracing::warn!(error = %err, "poll error"),
            },
        }
    }

    integration
        .teardown()
        .await
        .context("heater integration teardown failed")?;
    tracing::info!("miheaterd stopped");
    Ok(())
}
