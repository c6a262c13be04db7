//! Launchpad Core Library
//!
//! Orchestrates a domain's path from "registered name" to "serving a landing page":
//! - Deployment pipeline (hosting registration, DNS zone and records, monitoring)
//! - Teardown of domains and landing pages across every external system
//! - Batch operations with per-item isolation
//!
//! Storage and job execution sit behind traits so the platform layer
//! decides where records live and how background work runs.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::OrchestratorConfig;
pub use error::{CoreError, CoreResult};
pub use services::{
    BatchRunner, DeploymentMonitor, DeploymentOrchestrator, ServiceContext, TeardownOrchestrator,
    TokioJobQueue,
};
pub use traits::{
    AssetStore, DeploymentRepository, DomainRepository, JobQueue, LandingPageRepository,
    SiteBundleSource,
};
