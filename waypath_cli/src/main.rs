use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing::info;
use waypath_planner::planner_client::{PlannerClient, PlannerClientParams};

use crate::{
    config::{Config, ConfigArgs},
    plan::PlanSubcommands,
    resolve::ResolveArgs,
    session::{MapSession, OutputArgs},
};

mod camera;
mod cities;
mod config;
mod parsers;
mod plan;
mod render;
mod resolve;
mod session;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cities known to the planner
    Cities,
    /// Plan a tour and resolve it into a road-following map
    #[command(visible_alias = "p")]
    Plan {
        #[command(subcommand)]
        strategy: PlanSubcommands,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Resolve a route read from a JSON file
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config)?;

    match cli.command {
        Commands::Cities => {
            let planner = planner_client(&config)?;
            let cities = planner
                .cities()
                .await
                .context("Failed to fetch the city list")?;

            println!("{}", cities::cities_table(&cities));
        }
        Commands::Plan { strategy, output } => {
            let planner = planner_client(&config)?;
            let plan = plan::fetch_plan(&planner, strategy).await?;

            let all_cities = if plan.route.is_empty() {
                info!("Planner returned an empty route, framing every city");
                planner
                    .cities()
                    .await
                    .context("Failed to fetch the city list")?
            } else {
                Vec::new()
            };

            let mut session = MapSession::new(&config, output.viewport())?;
            let map = session
                .show(plan.route, &plan.suggested_cities, &all_cities)
                .await?;

            session::write_output(&map, &output)?;
        }
        Commands::Resolve { args, output } => {
            let route = resolve::read_route(&args)?;

            let mut session = MapSession::new(&config, output.viewport())?;
            let map = session.show(route, &[], &[]).await?;

            session::write_output(&map, &output)?;
        }
    }

    Ok(())
}

fn planner_client(config: &Config) -> anyhow::Result<PlannerClient> {
    PlannerClient::new(PlannerClientParams {
        base_url: config.planner_url.clone(),
        ..PlannerClientParams::default()
    })
    .context("Failed to create planner client")
}
