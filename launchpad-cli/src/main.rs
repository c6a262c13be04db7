//! Launchpad operator CLI
//!
//! Drives the deployment pipeline against the configured Cloudflare zone,
//! Vercel team and local `SQLite` store. Every command prints its result as
//! JSON on stdout; logs go to stderr.
//!
//! ## Commands
//!
//! - `launchpad deploy <domain>` - start a deployment and follow it to the end
//! - `launchpad status <domain>` - latest deployment and domain state
//! - `launchpad teardown <id>` - remove a domain (or `--landing-page`) everywhere
//! - `launchpad batch-deploy|batch-create|batch-teardown` - bulk variants
//! - `launchpad resume` - pick up deployments interrupted by a previous run

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launchpad_app::config::CONFIG_FILE;
use launchpad_app::{AppConfig, AppState, AppStateBuilder};
use launchpad_core::types::{
    AttemptStatus, BatchOperation, BatchResult, CreateDomainRequest, DnsManagement,
    TeardownTarget,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Launchpad - provision domains and deploy their landing pages
#[derive(Parser)]
#[command(name = "launchpad")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, env = "LAUNCHPAD_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LAUNCHPAD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a deployment for one domain
    Deploy {
        /// Domain id or name
        domain: String,

        /// Return right after the attempt is recorded; `resume` picks it up later
        #[arg(long)]
        detach: bool,
    },

    /// Show a domain and its latest deployment
    Status {
        /// Domain id or name
        domain: String,
    },

    /// Remove a domain or landing page from every external system
    Teardown {
        /// Domain id or name, or landing page id with `--landing-page`
        id: String,

        #[arg(long)]
        landing_page: bool,
    },

    /// Start deployments for several domains
    BatchDeploy {
        /// Domain ids or names
        #[arg(required = true)]
        domains: Vec<String>,

        #[arg(long)]
        detach: bool,
    },

    /// Create domains and start their first deployment
    BatchCreate {
        /// Domain names
        #[arg(required = true)]
        names: Vec<String>,

        /// DNS is managed outside the configured provider
        #[arg(long)]
        external_dns: bool,

        #[arg(long)]
        detach: bool,
    },

    /// Tear down several domains or landing pages
    BatchTeardown {
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(long)]
        landing_pages: bool,
    },

    /// Re-enqueue deployments left in flight by an earlier process
    Resume {
        #[arg(long)]
        detach: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str())),
        )
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = resolve_config_path(cli.config.as_deref());
    tracing::debug!("Loading configuration from {}", config_path.display());
    let config = AppConfig::from_file(&config_path)
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    let state = AppStateBuilder::from_config(&config)
        .await
        .context("Failed to open stores and provider clients")?
        .build()?;

    match cli.command {
        Commands::Deploy { domain, detach } => {
            let id = state.resolve_domain_id(&domain).await?;
            let started = state.orchestrator.start(&id).await?;
            if !started.started || detach {
                print_json(&started)?;
                return Ok(exit_code(started.started));
            }
            state.wait_idle().await;
            let report = state.orchestrator.status(&id).await?;
            let deployed = report
                .latest_deployment
                .as_ref()
                .is_some_and(|d| d.status == AttemptStatus::Deployed);
            print_json(&report)?;
            Ok(exit_code(deployed))
        }
        Commands::Status { domain } => {
            let id = state.resolve_domain_id(&domain).await?;
            print_json(&state.orchestrator.status(&id).await?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Teardown { id, landing_page } => {
            let target = if landing_page {
                TeardownTarget::LandingPage(id)
            } else {
                TeardownTarget::Domain(state.resolve_domain_id(&id).await?)
            };
            let result = state.teardown.delete(&target).await?;
            print_json(&result)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::BatchDeploy { domains, detach } => {
            let ids = resolve_all(&state, &domains).await;
            let result = state.batch.run_batch(&ids, BatchOperation::Deploy).await?;
            finish_batch(&state, &result, detach).await
        }
        Commands::BatchCreate {
            names,
            external_dns,
            detach,
        } => {
            let dns_management = if external_dns {
                DnsManagement::ExternallyManaged
            } else {
                DnsManagement::ProviderManaged
            };
            let requests = names
                .into_iter()
                .map(|name| CreateDomainRequest {
                    dns_management,
                    ..CreateDomainRequest::new(name)
                })
                .collect();
            let result = state.batch.create_batch(requests).await?;
            finish_batch(&state, &result, detach).await
        }
        Commands::BatchTeardown { ids, landing_pages } => {
            let (ids, op) = if landing_pages {
                (ids, BatchOperation::TeardownLandingPage)
            } else {
                (resolve_all(&state, &ids).await, BatchOperation::TeardownDomain)
            };
            let result = state.batch.run_batch(&ids, op).await?;
            finish_batch(&state, &result, true).await
        }
        Commands::Resume { detach } => {
            let resumed = state.run_startup().await?;
            if !detach {
                state.wait_idle().await;
            }
            print_json(&serde_json::json!({ "resumed": resumed }))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `--config`, then `./launchpad.toml`, then the platform config directory.
fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("launchpad").join(CONFIG_FILE))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Names are resolved to ids; unknown entries pass through and fail inside the batch.
async fn resolve_all(state: &AppState, keys: &[String]) -> Vec<String> {
    let mut ids = Vec::with_capacity(keys.len());
    for key in keys {
        ids.push(state.resolve_domain_id(key).await.unwrap_or_else(|_| key.clone()));
    }
    ids
}

async fn finish_batch(state: &AppState, result: &BatchResult, detach: bool) -> Result<ExitCode> {
    if !detach {
        state.wait_idle().await;
    }
    print_json(result)?;
    Ok(exit_code(result.failed.is_empty()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
