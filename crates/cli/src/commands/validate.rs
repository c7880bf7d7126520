//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{NotifierKind, TailConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    path: String,
    endpoint: String,
    topic: String,
    notifier: NotifierKind,
    chunk_size: usize,
    ingest_interval_secs: f64,
    flush_interval_secs: f64,
}

impl From<&TailConfig> for ConfigSummary {
    fn from(config: &TailConfig) -> Self {
        Self {
            path: config
                .source
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            endpoint: config.target.endpoint.clone(),
            topic: config.target.topic.clone(),
            notifier: config.delivery.notifier,
            chunk_size: config.source.chunk_size,
            ingest_interval_secs: config.source.ingest_interval_secs,
            flush_interval_secs: config.delivery.flush_interval_secs,
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary::from(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &TailConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.delivery.notifier == NotifierKind::Log {
        warnings.push("notifier is 'log' - messages will only be logged, not posted".to_string());
    }

    if config.delivery.flush_interval_secs == 0.0 {
        warnings.push(
            "delivery.flush_interval_secs is 0 - outbound posts are not rate limited".to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  File: {}", summary.path);
            println!("  Endpoint: {}", summary.endpoint);
            println!("  Channel: {}", summary.topic);
            println!("  Notifier: {:?}", summary.notifier);
            println!("  Chunk size: {} bytes", summary.chunk_size);
            println!("  Ingest interval: {}s", summary.ingest_interval_secs);
            println!("  Flush interval: {}s", summary.flush_interval_secs);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
