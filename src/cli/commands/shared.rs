//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and the human-readable rendering of
//! parsed metadata used by both commands.

use crate::app::models::ParsedMetadata;
use crate::cli::args::ScanArgs;
use crate::config::{ScanConfig, resolve_config_file};
use crate::{Error, Result};
use colored::*;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dsc_processor={}", log_level)));

    let installed = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load scan settings: configuration file first, then CLI overrides
pub fn load_scan_config(args: &ScanArgs) -> Result<ScanConfig> {
    let config_file = resolve_config_file(args.config_file.as_deref())
        .map_err(|e| Error::configuration(format!("{:#}", e)))?;

    let base = match config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            ScanConfig::load(&path)?
        }
        None => {
            info!("No config file found, using defaults");
            ScanConfig::default()
        }
    };

    let config = args.apply_overrides(base);
    config.validate()?;
    Ok(config)
}

fn field<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".dimmed().to_string(),
    }
}

/// Print every field of one parsed file
pub fn print_metadata(metadata: &ParsedMetadata) {
    println!(
        "{} {}",
        "Frame".bright_green().bold(),
        metadata.frame_name().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Source:".bright_cyan(),
        metadata.source_file_path().display()
    );
    println!(
        "  {} {}",
        "Data file:".bright_cyan(),
        metadata.derived_data_file_path().display()
    );
    println!(
        "  {} {}x{}",
        "Dimensions:".bright_cyan(),
        metadata.frame_width(),
        metadata.frame_height()
    );
    println!(
        "  {} {}",
        "Start time:".bright_cyan(),
        field(metadata.start_time_string())
    );
    println!(
        "  {} {}",
        "Epoch:".bright_cyan(),
        field(metadata.start_time_epoch())
    );
    println!(
        "  {} {}",
        "Chipboard ID:".bright_cyan(),
        field(metadata.chipboard_id())
    );
    println!(
        "  {} {}",
        "Medipix type:".bright_cyan(),
        field(metadata.mpx_type().map(|t| t.description()))
    );
    println!(
        "  {} {}",
        "Polarity:".bright_cyan(),
        field(metadata.polarity())
    );
    println!(
        "  {} {}",
        "Bias voltage [V]:".bright_cyan(),
        field(metadata.bias_voltage())
    );
    println!(
        "  {} {}",
        "Acq mode:".bright_cyan(),
        field(metadata.acquisition_mode())
    );
    println!(
        "  {} {}",
        "Acq time [s]:".bright_cyan(),
        field(metadata.acquisition_time_seconds())
    );
    println!(
        "  {} {}",
        "Hw timer mode:".bright_cyan(),
        field(metadata.hw_timer_mode())
    );
    println!(
        "  {} {}",
        "Medipix clock [MHz]:".bright_cyan(),
        field(metadata.mpx_clock_mhz())
    );
    println!(
        "  {} {}",
        "Timepix clock [MHz]:".bright_cyan(),
        field(metadata.tpx_clock_mhz())
    );
    println!(
        "  {} {}",
        "Firmware:".bright_cyan(),
        field(metadata.firmware_version())
    );
    println!(
        "  {} {}",
        "Interface:".bright_cyan(),
        field(metadata.interface_name())
    );
    println!(
        "  {} {}",
        "Pixelman version:".bright_cyan(),
        field(metadata.pixelman_version())
    );
    println!(
        "  {} {}",
        "Name+SN:".bright_cyan(),
        field(metadata.name_and_serial_number())
    );

    match metadata.dac_values() {
        Some(dacs) => {
            println!("  {}", "DACs:".bright_cyan());
            for (name, value) in dacs.named() {
                println!("    {:<12} {}", name, value.to_string().bright_white());
            }
        }
        None => println!("  {} {}", "DACs:".bright_cyan(), field(None::<i32>)),
    }
}
