use std::time::Duration;

use anyhow::Context;
use clap::Args;
use waypath_core::{path_assembler::DEFAULT_PACING, segment_router::DEFAULT_SEGMENT_TIMEOUT};
use waypath_osrm::client::OSRM_PUBLIC_URL;
use waypath_planner::planner_client::DEFAULT_PLANNER_URL;

use crate::parsers;

const PLANNER_URL_ENV_VAR: &str = "WAYPATH_PLANNER_URL";
const OSRM_URL_ENV_VAR: &str = "WAYPATH_OSRM_URL";
const OSRM_PROFILE_ENV_VAR: &str = "WAYPATH_OSRM_PROFILE";
const SEGMENT_TIMEOUT_ENV_VAR: &str = "WAYPATH_SEGMENT_TIMEOUT";
const PACING_ENV_VAR: &str = "WAYPATH_PACING";

/// Flags override the environment, which overrides the defaults.
#[derive(Args, Default)]
pub struct ConfigArgs {
    /// Base URL of the route planning service
    #[arg(long, global = true)]
    planner_url: Option<String>,

    /// Base URL of the OSRM server
    #[arg(long, global = true)]
    osrm_url: Option<String>,

    /// OSRM routing profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Timeout of a single road segment request (e.g. "10s", "PT5S")
    #[arg(long, global = true, value_parser = parsers::parse_duration)]
    segment_timeout: Option<Duration>,

    /// Delay between two road segment requests (e.g. "150ms")
    #[arg(long, global = true, value_parser = parsers::parse_duration)]
    pacing: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub planner_url: String,
    pub osrm_url: String,
    pub osrm_profile: String,
    pub segment_timeout: Duration,
    pub pacing: Duration,
}

impl Config {
    pub fn load(args: ConfigArgs) -> anyhow::Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    fn resolve<F>(args: ConfigArgs, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let duration = |flag: Option<Duration>,
                        key: &str,
                        default: Duration|
         -> anyhow::Result<Duration> {
            if let Some(value) = flag {
                return Ok(value);
            }

            match env(key) {
                Some(raw) => parsers::parse_duration(&raw)
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("Invalid {key}")),
                None => Ok(default),
            }
        };

        Ok(Self {
            planner_url: args
                .planner_url
                .or_else(|| env(PLANNER_URL_ENV_VAR))
                .unwrap_or_else(|| String::from(DEFAULT_PLANNER_URL)),
            osrm_url: args
                .osrm_url
                .or_else(|| env(OSRM_URL_ENV_VAR))
                .unwrap_or_else(|| String::from(OSRM_PUBLIC_URL)),
            osrm_profile: args
                .profile
                .or_else(|| env(OSRM_PROFILE_ENV_VAR))
                .unwrap_or_else(|| String::from("driving")),
            segment_timeout: duration(
                args.segment_timeout,
                SEGMENT_TIMEOUT_ENV_VAR,
                DEFAULT_SEGMENT_TIMEOUT,
            )?,
            pacing: duration(args.pacing, PACING_ENV_VAR, DEFAULT_PACING)?,
        })
    }
}
