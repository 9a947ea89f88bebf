use crate::commands::{run_check, run_guidance, run_roadmap, CheckArgs, GuidanceArgs, RoadmapArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_navigator::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Navigator",
    about = "Find the welfare schemes a citizen qualifies for and walk through applying",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the eligibility HTTP API (default command)
    Serve(ServeArgs),
    /// Start the form filling agent HTTP API
    Agent(ServeArgs),
    /// Check eligibility for a profile and print matching schemes
    Check(CheckArgs),
    /// Print the application roadmap for a scheme
    Roadmap(RoadmapArgs),
    /// Print form guidance for a scheme step
    Guidance(GuidanceArgs),
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
        Command::Serve(args) => server::run_eligibility(args).await,
        Command::Agent(args) => server::run_agent(args).await,
        Command::Check(args) => run_check(args),
        Command::Roadmap(args) => run_roadmap(args),
        Command::Guidance(args) => run_guidance(args),
    }
}
