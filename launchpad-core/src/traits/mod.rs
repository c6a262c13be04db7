//! Storage layer abstraction trait definition

mod asset_store;
mod deployment_repository;
mod domain_repository;
mod job_queue;
mod landing_page_repository;
mod site_bundle_source;

pub use asset_store::AssetStore;
pub use deployment_repository::DeploymentRepository;
pub use domain_repository::DomainRepository;
pub use job_queue::{Job, JobQueue};
pub use landing_page_repository::LandingPageRepository;
pub use site_bundle_source::SiteBundleSource;
