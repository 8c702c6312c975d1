use clap::Parser;
use snapwatch_cli::{Cli, logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level)?;
    run(cli).await
}
