use crate::batch::{run_print_config, run_score, ConfigArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use txn_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Transaction Risk Engine",
    about = "Score payment transactions from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score every row of a transaction CSV and write the decisions
    Score(ScoreArgs),
    /// Print the active risk configuration as JSON
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Config(args) => run_print_config(args),
    }
}
