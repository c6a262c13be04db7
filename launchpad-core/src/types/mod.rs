//! 类型定义模块

mod deployment;
mod dns;
mod domain;
mod landing_page;
mod results;

pub use deployment::{AttemptStatus, DeploymentLogEntry, DomainDeployment, LogLevel};
pub use dns::HostingTargets;
pub use domain::{
    validate_domain_name, CreateDomainRequest, DeploymentStatus, DnsManagement, Domain,
    VerificationStatus,
};
pub use landing_page::LandingPage;
pub use results::{
    BatchFailure, BatchOperation, BatchResult, DeploymentStatusReport, MonitorOutcome,
    ReconcileAction, ReconcileOutcome, StartResult, TeardownResult, TeardownTarget,
};

// Re-export provider 库的公共类型
pub use launchpad_provider::{
    ConfigurationDnsRecord, CreateDnsRecordRequest, DnsRecord, DnsRecordType,
    HostingDomainStatus, HostingRegistration, ReadyState, RegisterDomainRequest, SiteBundle,
    SiteFile, WorkerRoute,
};
