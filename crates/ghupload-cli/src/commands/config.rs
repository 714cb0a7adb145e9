//! Config command - View and check the ghupload configuration
//!
//! Provides the `ghupload config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors
//! 3. Prints where the configuration file is looked up

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use ghupload_core::config::Config;

use super::{CommandContext, ExitStatus};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitStatus> {
        match self {
            ConfigCommand::Show => execute_show(ctx),
            ConfigCommand::Validate => execute_validate(ctx),
            ConfigCommand::Path => execute_path(ctx),
        }
    }
}

fn execute_show(ctx: &CommandContext) -> Result<ExitStatus> {
    let formatter = ctx.formatter();
    let config = ctx.load_config()?;

    info!(config_path = %ctx.config_path.display(), "Showing configuration");

    if ctx.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(ExitStatus::Success)
}

/// Reports every problem at once; an invalid file exits with status 1
fn execute_validate(ctx: &CommandContext) -> Result<ExitStatus> {
    let formatter = ctx.formatter();
    let config_path = &ctx.config_path;

    if !config_path.exists() {
        // --config must point at a file; the default location may be empty
        let valid = !ctx.explicit_config;
        if ctx.is_json() {
            let errors: Vec<String> = if valid {
                Vec::new()
            } else {
                vec!["Configuration file not found".to_string()]
            };
            formatter.print_json(&serde_json::json!({
                "valid": valid,
                "config_path": config_path.display().to_string(),
                "errors": errors,
            }));
        } else if valid {
            formatter.success("No configuration file, defaults are valid");
            formatter.info(&format!("Expected at {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration file not found: {}",
                config_path.display()
            ));
        }
        return Ok(if valid {
            ExitStatus::Success
        } else {
            ExitStatus::Precondition
        });
    }

    let config = match Config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if ctx.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": [format!("Failed to parse configuration: {}", e)],
                }));
            } else {
                formatter.error(&format!("Failed to parse configuration: {}", e));
                formatter.info(&format!("File: {}", config_path.display()));
            }
            return Ok(ExitStatus::Precondition);
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = config.validate();

    if ctx.is_json() {
        let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": error_strings,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", config_path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    Ok(if errors.is_empty() {
        ExitStatus::Success
    } else {
        ExitStatus::Precondition
    })
}

fn execute_path(ctx: &CommandContext) -> Result<ExitStatus> {
    let formatter = ctx.formatter();
    let exists = ctx.config_path.exists();

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "config_path": ctx.config_path.display().to_string(),
            "exists": exists,
        }));
    } else {
        // Printed even in quiet mode so scripts can capture it
        println!("{}", ctx.config_path.display());
        if !exists {
            formatter.info("(file does not exist, defaults are used)");
        }
    }

    Ok(ExitStatus::Success)
}
