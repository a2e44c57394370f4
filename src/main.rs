use alpha_tourney::adapter::inbound::cli::command::{Cli, Commands};
use alpha_tourney::adapter::inbound::cli::{check, finalized, operator, output, run};
use alpha_tourney::error::Result;
use alpha_tourney::infrastructure::operator::entry::Operator;
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));
    let _ = operator::install(Box::new(Operator));

    if let Err(e) = dispatch(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&cli.config, &args).await,
        Commands::Check => check::execute(&cli.config),
        Commands::Finalized(args) => finalized::execute(&cli.config, &args),
    }
}
