use clap::Parser;
use explore_local::adapters::sink::{ConsoleSink, OutputFormat};
use explore_local::core::ConfigProvider;
use explore_local::utils::error::ErrorSeverity;
use explore_local::utils::{logger, validation::Validate};
use explore_local::{build_http_pipeline, CliConfig, FixedLocation, LocationIntent, TomlConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting explore-local");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // a config file replaces the service and search flags; location flags still apply
    let file_config = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let file_config = TomlConfig::from_file(path)?;
            if let Err(e) = file_config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
            Some(file_config)
        }
        None => None,
    };

    let services: &dyn ConfigProvider = match &file_config {
        Some(file_config) => file_config,
        None => &config,
    };
    let format = match &file_config {
        Some(file_config) if config.format == OutputFormat::Text => file_config.output.format,
        _ => config.format,
    };

    let city = config
        .city
        .clone()
        .or_else(|| file_config.as_ref().and_then(|f| f.search.city.clone()));
    let location = match config.device_fix()? {
        Some(fix) => FixedLocation::new(fix),
        None => FixedLocation::unavailable(),
    };
    let intent = match city {
        Some(city) => LocationIntent::City(city),
        None => LocationIntent::DeviceLocation,
    };

    let pipeline = build_http_pipeline(
        services,
        Arc::new(location),
        Arc::new(ConsoleSink::new(format)),
    )?;

    let outcome = pipeline.search(intent).await;

    if let Some(kind) = outcome.failure {
        tracing::warn!("Search {} ended without results ({:?})", outcome.token, kind);
        eprintln!("💡 {}", kind.recovery_suggestion());
        let exit_code = match kind.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 3,
            ErrorSeverity::Critical => 1,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
