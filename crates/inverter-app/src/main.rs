use std::env;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use entity_binder::{bind, Controller};
use inverter_app::config::load_raw_config;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    entity_registry::verify().context("descriptor table verification failed")?;

    let config_path = parse_config_arg();
    let raw = load_raw_config(config_path.as_deref()).context("load config failed")?;
    let config = config_schema::validate(&raw).context("config validation failed")?;
    info!(
        fields = config.len(),
        uart_id = config.uart_id(),
        "configuration validated"
    );

    let mut controller = Controller::new();
    let result = bind(&config, &mut controller);
    for slot in controller.registered_slots() {
        debug!(slot = *slot, "registered");
    }

    if !result.is_complete() {
        for error in &result.errors {
            warn!(%error, "binding error");
        }
        anyhow::bail!(
            "{} of {} fields failed to bind",
            result.errors.len(),
            config.len()
        );
    }

    info!(bound = result.bound, "controller ready");
    Ok(())
}

fn parse_config_arg() -> Option<String> {
    env::args().nth(1)
}
