pub mod plan;
pub mod planner_client;
