//! Leave Engine server binary.
//!
//! Reads `LEAVE_POLICY_PATH` and `BIND_ADDR` (a `.env` file is honoured),
//! loads the leave policy, and serves the HTTP API.

use std::env;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leave_engine::api::{AppState, create_router};
use leave_engine::config::PolicyLoader;

const DEFAULT_POLICY_PATH: &str = "./config/leave_policy.yaml";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let policy_path = env::var("LEAVE_POLICY_PATH").unwrap_or_else(|_| DEFAULT_POLICY_PATH.to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let loader = PolicyLoader::load(&policy_path)?;
    let policy = loader.policy();
    info!(
        path = %policy_path,
        leave_year_start_month = policy.leave_year_start_month,
        monthly_accrual = policy.monthly_accrual,
        sandwich_cluster_weight = policy.sandwich_cluster_weight,
        reference_utc_offset_minutes = policy.reference_utc_offset_minutes,
        "Leave policy loaded"
    );

    let router = create_router(AppState::new(loader));
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Server starting...");

    axum::serve(listener, router).await?;
    Ok(())
}
