//! `gantry config show` -- display resolved configuration.

use gantry_types::Config;

/// Print the configuration as formatted JSON.
pub fn config_show(config: &Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
