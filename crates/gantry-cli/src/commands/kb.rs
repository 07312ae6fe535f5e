//! `gantry kb validate` -- probe a knowledge-base id against the catalog.

use gantry_core::build_services;

use super::load_base_config;

pub async fn validate(kb_id: &str, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_base_config(config_path)?;
    config.validate()?;
    let mut services = build_services(&config)?;

    let id = services.gate.check(kb_id).await?;
    println!("knowledge base '{id}' is valid");
    Ok(())
}
