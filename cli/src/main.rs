mod decimate;
mod io;
mod options;
mod plot;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "decimator",
    about = "Min-max decimation of dense line data for a fixed pixel width"
)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "decimator=debug")
    #[clap(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decimate points and write them back out
    Decimate(decimate::Opts),
    /// Generate an HTML line plot from decimated points
    Plot(plot::Opts),
}

/// Logs go to stderr so decimated points can be piped from stdout.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);
    match cli.command {
        Command::Decimate(opts) => decimate::decimate(&opts).await,
        Command::Plot(opts) => plot::plot(&opts).await,
    }
}
