use clap::Parser;
use dsc_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(dsc_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("DSC Processor - Pixelman Timepix detector settings reader");
    println!("=========================================================");
    println!();
    println!("Parse and validate the DSC metadata files written next to each");
    println!("Timepix frame by the Pixelman acquisition software.");
    println!();
    println!("USAGE:");
    println!("    dsc-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    inspect     Parse a single DSC file and print its metadata");
    println!("    scan        Parse every DSC file in a folder, in chronological order");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Show one frame's settings:");
    println!("    dsc-processor inspect run01/frame_0001.txt.dsc");
    println!();
    println!("    # List every frame in a run as JSON, stopping at the first bad file:");
    println!("    dsc-processor scan run01 --fail-fast --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    dsc-processor <COMMAND> --help");
}
