//! Non-core: binary entry point (spec.md §6, SPEC_FULL.md §6a).
//!
//! Parses arguments with `clap`, initializes `tracing`, dispatches to
//! `rt5d_prog::cli`, and maps the resulting `Result` to the documented
//! exit codes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rt5d_prog::cli;
use rt5d_prog::error::Error;

#[derive(Parser)]
#[command(name = "rt5d-prog", about = "RT-5D / JJCC-888DMR codeplug programming tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Raise the log level to debug. Equivalent to `RT5D_LOG=debug`, which
    /// takes precedence if both are set.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run built-in self tests; exit 0 iff all pass.
    Test,
    /// List serial port names, sorted.
    Ports,
    /// Handshake + password + version read + end; print version block.
    Info { port: String },
    /// Read the full codeplug and write it as a document.
    Read {
        port: String,
        #[arg(default_value = "rt5d_config.json")]
        outfile: PathBuf,
    },
    /// Parse a document and write the full codeplug to the radio.
    Write {
        port: String,
        infile: PathBuf,
        /// Also write the basic-info block (model name/id). Off by
        /// default (spec.md §4.4 step 11: "write only when caller
        /// explicitly opts in").
        #[arg(long = "basic-info")]
        basic_info: bool,
    },
}

fn init_tracing(debug: bool) {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("RT5D_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() {
    let cli_args = Cli::parse();
    init_tracing(cli_args.debug);

    let result = match cli_args.command {
        Command::Test => cli::run_self_test(),
        Command::Ports => cli::run_ports(),
        Command::Info { port } => cli::run_info(&port).await,
        Command::Read { port, outfile } => cli::run_read(&port, &outfile).await,
        Command::Write { port, infile, basic_info } => {
            cli::run_write(&port, &infile, basic_info).await
        }
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(exit_code_for(&err));
    }
}

fn exit_code_for(err: &Error) -> i32 {
    err.exit_code()
}
