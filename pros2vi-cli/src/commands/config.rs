//! Config command implementation - show example or effective configuration

use anyhow::{Context, Result};

use crate::config::Config;

pub fn execute(config: &Config, example: bool) -> Result<()> {
    let content = if example {
        Config::example_toml()?
    } else {
        toml::to_string_pretty(config).context("Failed to serialize configuration")?
    };
    print!("{}", content);
    Ok(())
}
