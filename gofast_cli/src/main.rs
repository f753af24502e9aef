use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{directions::DirectionsArgs, plan::PlanArgs, run::RunArgs};

mod directions;
mod env;
mod orders;
mod parsers;
mod plan;
mod run;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the optimizer for the stop order of a run
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// Fetch the driving directions between two points
    #[command(visible_alias = "d")]
    Directions {
        #[command(flatten)]
        args: DirectionsArgs,
    },
    /// Replay a delivery run from a recorded trace
    Run {
        #[command(flatten)]
        args: RunArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Plan { args }) => plan::run(args).await?,
        Some(Commands::Directions { args }) => directions::run(args).await?,
        Some(Commands::Run { args }) => run::run(args).await?,
        None => {}
    }

    Ok(())
}
