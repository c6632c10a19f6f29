//! Inspect command: parse and print a single DSC file

use super::shared::{print_metadata, setup_logging};
use crate::app::services::dsc_parser::DscParser;
use crate::cli::args::{InspectArgs, OutputFormat};
use crate::{Error, Result};
use tracing::info;

pub async fn run_inspect(args: InspectArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    info!("Inspecting {}", args.file.display());

    let file = args.file.clone();
    let metadata = tokio::task::spawn_blocking(move || DscParser::new().parse_file(&file))
        .await
        .map_err(|e| Error::worker(format!("DSC parse task failed: {}", e)))??;

    match args.output_format {
        OutputFormat::Human => print_metadata(&metadata),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&metadata)?;
            println!("{}", json);
        }
    }

    Ok(())
}
