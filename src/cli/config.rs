// src/cli/config.rs
// Show resolved configuration

use anyhow::Result;
use fileflow::config::{EnvConfig, FileFlowConfig};

/// Print the effective configuration and its validation report
pub fn run_config() -> Result<()> {
    let config = EnvConfig::load();
    let path = FileFlowConfig::config_path();

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not found, using defaults)");
    }
    println!();
    println!("server.name                     = {}", config.server_name);
    println!("command.confirm                 = {}", config.command.confirm);
    println!(
        "command.elicitation_timeout_secs = {}",
        config.command.elicitation_timeout.as_secs()
    );
    println!(
        "command.prompt_settle_ms        = {}",
        config.command.prompt_settle.as_millis()
    );
    println!("command.echo                    = {:?}", config.command.echo);
    if let Some(level) = &config.log_level {
        println!("log level (FILEFLOW_LOG)        = {}", level);
    }
    println!();
    println!("{}", config.validate().report());

    Ok(())
}
