use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use spdlog::{error, info, warn};

use blogsmith::config::{open_config, Config};
use blogsmith::logger::configure_logger;
use blogsmith::server::serve;
use blogsmith::site_builder::build;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the content tree into the publish directory
    Build(BuildArgs),
    /// Serve the publish directory over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Empty the publish directory first
    #[arg(long)]
    clean: bool,

    /// Front matter delimiter
    #[arg(short, long)]
    delimiter: Option<String>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

fn run_build(mut config: Config, args: BuildArgs) -> ExitCode {
    config.clean = args.clean;
    if let Some(delimiter) = args.delimiter {
        config.front_matter.delimiter = delimiter;
    }

    let code = match build(&config) {
        Ok(summary) => {
            info!("Site ready in {}", summary.publish_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Build failed: {}", err);
            ExitCode::FAILURE
        }
    };
    spdlog::default_logger().flush();
    code
}

#[ntex::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config, config_path) = open_config(cli.config)
        .context("Could not load the configuration, please run blogsmith --help")?;

    if let Err(err) = configure_logger(&config, cli.verbose) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match config_path {
        Some(path) => info!("Using configuration {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    match cli.command {
        Command::Build(args) => Ok(run_build(config, args)),
        Command::Serve(args) => {
            let port = args.port.unwrap_or(config.server.port);
            serve(config.paths.publish_dir, config.server.address, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
