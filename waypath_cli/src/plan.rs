use anyhow::Context;
use clap::Subcommand;
use tracing::info;
use waypath_core::waypoint::Waypoint;
use waypath_planner::{plan::PlanResponse, planner_client::PlannerClient};

#[derive(Subcommand)]
pub enum PlanSubcommands {
    /// Nearest-neighbour tour from a start city
    Greedy {
        #[arg(short, long)]
        start: String,

        /// Cities the tour must visit, every city when omitted
        #[arg(short, long)]
        must_visit: Vec<String>,

        #[arg(short, long)]
        return_to_start: bool,
    },
    /// Route between a start and an end city
    #[command(visible_alias = "i")]
    Intelligent {
        #[arg(short, long)]
        start: String,

        #[arg(short, long)]
        end: String,
    },
}

pub async fn fetch_plan(
    planner: &PlannerClient,
    subcommand: PlanSubcommands,
) -> anyhow::Result<PlanResponse> {
    let plan = match subcommand {
        PlanSubcommands::Greedy {
            start,
            must_visit,
            return_to_start,
        } => planner
            .plan_greedy(&start, &must_visit, return_to_start)
            .await
            .with_context(|| format!("Failed to plan a tour from {start}"))?,
        PlanSubcommands::Intelligent { start, end } => planner
            .plan_intelligent(&start, &end)
            .await
            .with_context(|| format!("Failed to plan a route from {start} to {end}"))?,
    };

    if !plan.description.is_empty() {
        info!("{}", plan.description);
    }

    if let Some(distance) = plan.total_distance_km {
        info!("Planned distance: {:.1} km", distance);
    }

    if !plan.suggested_cities.is_empty() {
        let names: Vec<&str> = plan.suggested_cities.iter().map(Waypoint::name).collect();
        info!("Suggested stops: {}", names.join(", "));
    }

    Ok(plan)
}
