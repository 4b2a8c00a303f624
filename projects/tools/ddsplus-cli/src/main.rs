#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs, Debug)]
/// Convert images to and from DDS textures
struct TopLevel {
    /// log every level written and every file processed
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Encode(commands::encode::EncodeCmd),
    Decode(commands::decode::DecodeCmd),
    Info(commands::info::InfoCmd),
}

/// Installs the fmt subscriber. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode(cmd) => {
            commands::encode::handle_encode_command(cmd)?;
        }
        Commands::Decode(cmd) => {
            commands::decode::handle_decode_command(cmd)?;
        }
        Commands::Info(cmd) => {
            commands::info::handle_info_command(cmd)?;
        }
    }

    Ok(())
}
