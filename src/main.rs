//! Block Hit Calculator - Command Line
//!
//! Fetches live coin data and prints the expected block time and earnings.

use block_hit_calculator::{
    catalog,
    config::{Config, LogFormat, OutputFormat},
    format::ResultDisplay,
    share, Calculation, CalculationState, Error, MinerstatClient, Result, Session, APP_DESCRIPTION,
    APP_NAME, APP_VERSION,
};

use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    // Load and validate configuration
    let config = Config::load().await?;

    init_tracing(&config);

    // Handle special commands
    if config.info {
        print_info();
        return Ok(ExitCode::SUCCESS);
    }

    if config.print_config {
        print_configuration(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    if config.list || config.search.is_some() {
        print_catalog(config.search.as_deref().unwrap_or(""), config.coin.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    if !config.wants_calculation() {
        return Err(Error::config(
            "Nothing to calculate. Use --coin and --hashrate, --query, or --list",
        ));
    }

    let provider = MinerstatClient::new(&config.provider_url, config.http_timeout_duration())?
        .with_api_key(config.api_key.clone());

    let request = config.request();
    debug!("Calculation request: {:?}", request);

    let mut session = Session::new();
    session.run(&provider, &request).await;

    match session.state() {
        CalculationState::Success { calculation } => {
            print_calculation(&config, calculation)?;
            Ok(ExitCode::SUCCESS)
        }
        CalculationState::Error { message, category } => {
            error!("Calculation failed ({})", category);
            if config.output == OutputFormat::Text {
                print_display(session.display());
            }
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
        state => Err(Error::generic(
            "calculation",
            format!("unexpected session state: {:?}", state),
        )),
    }
}

/// Initialize tracing on stderr so results on stdout stay clean
fn init_tracing(config: &Config) {
    let level: tracing::Level = config.log_level.into();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Print basic program information
fn print_info() {
    println!("{} v{}", APP_NAME, APP_VERSION);
    println!("{}", APP_DESCRIPTION);
}

/// Print current configuration
fn print_configuration(config: &Config) -> Result<()> {
    let config_yaml = serde_yaml::to_string(config)?;
    println!("{}", config_yaml);
    Ok(())
}

/// Print the catalog, grouped by algorithm, marking the selected coin
fn print_catalog(search: &str, current: Option<&str>) {
    let view = catalog::filter(search);
    let Some(selected) = catalog::reconcile_selection(current, &view) else {
        println!("No coins match \"{}\"", search);
        return;
    };

    for group in &view {
        println!("{}", group.algorithm);
        for coin in &group.coins {
            let marker = if coin.symbol == selected { '*' } else { ' ' };
            println!(" {} {:<6} {}", marker, coin.symbol, coin.name);
        }
    }
}

fn print_display(display: &ResultDisplay) {
    println!("Time to find a block:  {}", display.time_text);
    println!("Daily earnings:        {}", display.coin_earnings_text);
    println!("Current price:         {}", display.price_text);
    println!("Daily earnings (USD):  {}", display.usd_earnings_text);
}

/// Print a successful calculation in the configured format
fn print_calculation(config: &Config, calculation: &Calculation) -> Result<()> {
    let share_url = config
        .share_base_url()?
        .map(|base| calculation.share.share_url(&base));

    match config.output {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(calculation)?;
            if let Some(url) = &share_url {
                value["share_url"] = serde_json::Value::String(url.to_string());
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            print_display(&calculation.display);
            println!("Share query:           ?{}", calculation.share.to_query_string());
            if let Some(url) = &share_url {
                println!("Share link:            {}", url);
            }
        }
    }

    if config.embed {
        if let Some(url) = &share_url {
            println!("{}", share::embed_code(url));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_info_functions() {
        // These should not panic
        print_info();
        print_catalog("", None);
        print_catalog("coin", Some("LTC"));
        print_catalog("no such coin", None);
        print_display(&ResultDisplay::reset());
    }

    #[test]
    fn test_config_printing() {
        let config = Config::try_parse_from([
            "block-hit-calculator",
            "--coin", "BTC",
            "--hashrate", "100",
        ])
        .unwrap();

        let result = print_configuration(&config);
        assert!(result.is_ok());
    }
}
