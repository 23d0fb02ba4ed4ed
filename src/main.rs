use clap::Parser;
use page_probe::cli::commands::{cmd_addresses, cmd_scan, cmd_trace};
use page_probe::cli::config::{Cli, Commands, build_probe_config, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Scan {
            page,
            format,
            output,
        } => {
            // Resolve format: CLI > config > default
            let format = format.unwrap_or_else(|| config.scan.format.clone());
            cmd_scan(&page, &format, output.as_deref(), cli.verbose)?;
        }
        Commands::Addresses { page } => {
            cmd_addresses(&page)?;
        }
        Commands::Trace {
            page,
            script,
            format,
            output,
            max_timer_delay,
            trace_file,
        } => {
            let format = format.unwrap_or_else(|| config.scan.format.clone());
            let probe_config = build_probe_config(
                &config.instrument,
                max_timer_delay,
                trace_file.as_deref(),
            );
            cmd_trace(
                &page,
                &script,
                &format,
                output.as_deref(),
                &probe_config,
                cli.verbose,
            )?;
        }
    }

    Ok(())
}
