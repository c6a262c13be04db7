//! Vercel HostingPlatform trait 实现

use async_trait::async_trait;
use base64::Engine;

use crate::error::{ErrorKind, ProviderError, Result};
use crate::providers::common::{normalize_domain_name, slugify_domain};
use crate::traits::{ErrorContext, HostingPlatform, ProviderErrorMapper};
use crate::types::{
    ConfigurationDnsRecord, DnsRecordType, HostingDomainStatus, HostingRegistration, ReadyState,
    RegisterDomainRequest,
};

use super::VercelPlatform;
use super::types::{
    AddDomainBody, CreateDeploymentBody, CreateProjectBody, GitRepositoryRef, GitSource,
    InlineFile, ProjectSettings, VercelDeployment, VercelDomainEnvelope, VercelProject,
    VercelProjectDomain,
};

/// Where a deployment's sources come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeploySource {
    GitImport,
    DirectUpload,
}

/// When a strategy may run, given the outcome of earlier attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptWhen {
    /// Only if no earlier strategy was attempted.
    First,
    /// If nothing was attempted yet, or the last attempt was rejected by the platform.
    AfterRejection,
}

impl AttemptWhen {
    fn allows(self, previous: Option<&ProviderError>) -> bool {
        match self {
            Self::First => previous.is_none(),
            Self::AfterRejection => previous.is_none_or(|e| e.kind().is_rejection()),
        }
    }
}

const DEPLOY_STRATEGIES: &[(DeploySource, AttemptWhen)] = &[
    (DeploySource::GitImport, AttemptWhen::First),
    (DeploySource::DirectUpload, AttemptWhen::AfterRejection),
];

fn verification_records(domain: &VercelProjectDomain) -> Option<Vec<ConfigurationDnsRecord>> {
    if domain.verified || domain.verification.is_empty() {
        return None;
    }
    Some(
        domain
            .verification
            .iter()
            .map(|v| ConfigurationDnsRecord {
                record_type: serde_json::from_value(serde_json::Value::String(
                    v.record_type.to_ascii_uppercase(),
                ))
                .unwrap_or(DnsRecordType::Txt),
                name: normalize_domain_name(&v.domain),
                value: v.value.clone(),
            })
            .collect(),
    )
}

impl VercelPlatform {
    fn split_repository(&self) -> Option<(&str, &str)> {
        self.config
            .git_repository
            .as_deref()
            .and_then(|repo| repo.split_once('/'))
            .filter(|(org, repo)| !org.is_empty() && !repo.is_empty())
    }

    fn source_available(&self, source: DeploySource, req: &RegisterDomainRequest) -> bool {
        match source {
            DeploySource::GitImport => self.split_repository().is_some(),
            DeploySource::DirectUpload => req.bundle.as_ref().is_some_and(|b| !b.is_empty()),
        }
    }

    async fn ensure_project(&self, domain: &str, project_id: Option<&str>) -> Result<VercelProject> {
        if let Some(id) = project_id {
            return self
                .get_json(&format!("/v9/projects/{id}"), ErrorContext::resource(id))
                .await;
        }

        let slug = slugify_domain(domain);
        let body = CreateProjectBody {
            name: &slug,
            framework: None,
            git_repository: self
                .config
                .git_repository
                .as_deref()
                .map(|repo| GitRepositoryRef {
                    provider: "github",
                    repo,
                }),
        };

        match self
            .post_json::<VercelProject, _>("/v11/projects", &body, ErrorContext::resource(&slug))
            .await
        {
            Ok(project) => {
                log::info!("[vercel] Created project {} ({})", project.name, project.id);
                Ok(project)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::info!("[vercel] Project {slug} already exists, reusing it");
                self.get_json(&format!("/v9/projects/{slug}"), ErrorContext::resource(&slug))
                    .await
            }
            Err(e) => Err(e),
        }
    }

    async fn project_domain(&self, project_id: &str, name: &str) -> Result<VercelProjectDomain> {
        self.get_json(
            &format!("/v9/projects/{project_id}/domains/{name}"),
            ErrorContext::resource(name),
        )
        .await
    }

    /// Attach `name` to the project; an existing attachment to the same project is reused.
    async fn attach_domain(
        &self,
        project_id: &str,
        name: &str,
        redirect: Option<&str>,
    ) -> Result<VercelProjectDomain> {
        let body = AddDomainBody { name, redirect };
        match self
            .post_json::<VercelProjectDomain, _>(
                &format!("/v10/projects/{project_id}/domains"),
                &body,
                ErrorContext::resource(name),
            )
            .await
        {
            Ok(domain) => Ok(domain),
            Err(e) if matches!(e.kind(), ErrorKind::AlreadyExists | ErrorKind::Conflict) => {
                match self.project_domain(project_id, name).await {
                    Ok(existing)
                        if existing.project_id.as_deref().is_none_or(|p| p == project_id) =>
                    {
                        log::debug!("[vercel] {} already attached to {project_id}", existing.name);
                        Ok(existing)
                    }
                    Ok(_) => Err(e),
                    Err(lookup) if lookup.kind() == ErrorKind::NotFound => Err(e),
                    Err(lookup) => Err(lookup),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn create_deployment(
        &self,
        source: DeploySource,
        project: &VercelProject,
        req: &RegisterDomainRequest,
    ) -> Result<VercelDeployment> {
        let mut body = CreateDeploymentBody {
            name: &project.name,
            project: &project.id,
            target: "production",
            git_source: None,
            files: None,
            project_settings: None,
        };

        match source {
            DeploySource::GitImport => {
                let Some((org, repo)) = self.split_repository() else {
                    return Err(self.no_source_error(&req.name));
                };
                body.git_source = Some(GitSource {
                    provider: "github",
                    org,
                    repo,
                    git_ref: &self.config.git_ref,
                });
            }
            DeploySource::DirectUpload => {
                let Some(bundle) = req.bundle.as_ref() else {
                    return Err(self.no_source_error(&req.name));
                };
                let engine = base64::engine::general_purpose::STANDARD;
                body.files = Some(
                    bundle
                        .files
                        .iter()
                        .map(|f| InlineFile {
                            file: f.path.trim_start_matches('/').to_string(),
                            data: engine.encode(&f.contents),
                            encoding: "base64",
                        })
                        .collect(),
                );
                body.project_settings = Some(ProjectSettings { framework: None });
            }
        }

        self.post_json(
            "/v13/deployments?skipAutoDetectionConfirmation=1",
            &body,
            ErrorContext::resource(&project.name),
        )
        .await
    }

    fn no_source_error(&self, name: &str) -> ProviderError {
        ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: "source".to_string(),
            detail: format!(
                "no deployment source for {name}: configure a git repository or provide a site bundle"
            ),
        }
    }

    /// Run the deployment strategies in order until one succeeds.
    async fn deploy(
        &self,
        project: &VercelProject,
        req: &RegisterDomainRequest,
    ) -> Result<VercelDeployment> {
        let mut last_error: Option<ProviderError> = None;

        for (source, when) in DEPLOY_STRATEGIES {
            if !self.source_available(*source, req) || !when.allows(last_error.as_ref()) {
                continue;
            }
            match self.create_deployment(*source, project, req).await {
                Ok(deployment) => {
                    log::info!(
                        "[vercel] Deployment {} created via {source:?} at {}",
                        deployment.id,
                        deployment
                            .created_at
                            .map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
                    );
                    return Ok(deployment);
                }
                Err(e) => {
                    log::warn!("[vercel] {source:?} deployment for {} failed: {e}", req.name);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| self.no_source_error(&req.name)))
    }
}

#[async_trait]
impl HostingPlatform for VercelPlatform {
    fn id(&self) -> &'static str {
        "vercel"
    }

    async fn register_domain(&self, req: &RegisterDomainRequest) -> Result<HostingRegistration> {
        let name = normalize_domain_name(&req.name);
        let project = self.ensure_project(&name, req.project_id.as_deref()).await?;

        let apex = self.attach_domain(&project.id, &name, None).await?;
        let www = format!("www.{name}");
        if let Err(e) = self.attach_domain(&project.id, &www, Some(&name)).await {
            log::warn!("[vercel] Could not attach {www}: {e}");
        }

        let deployment = self.deploy(&project, req).await?;

        let mut urls = vec![format!("https://{name}"), format!("https://{www}")];
        if let Some(url) = deployment.url.as_deref() {
            urls.push(format!("https://{}", url.trim_start_matches("https://")));
        }

        Ok(HostingRegistration {
            deployment_id: deployment.id,
            project_id: project.id,
            urls,
            configuration_dns_records: verification_records(&apex),
        })
    }

    async fn get_domain_status(
        &self,
        name: &str,
        project_id: Option<&str>,
    ) -> Result<HostingDomainStatus> {
        let name = normalize_domain_name(name);

        let result = match project_id {
            Some(project_id) => self.project_domain(project_id, &name).await.map(|d| {
                HostingDomainStatus {
                    exists: true,
                    verified: d.verified,
                    configuration_dns_records: verification_records(&d),
                }
            }),
            None => self
                .get_json::<VercelDomainEnvelope>(
                    &format!("/v5/domains/{name}"),
                    ErrorContext::resource(&name),
                )
                .await
                .map(|d| HostingDomainStatus {
                    exists: true,
                    verified: d.domain.verified,
                    configuration_dns_records: None,
                }),
        };

        match result {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HostingDomainStatus {
                exists: false,
                verified: false,
                configuration_dns_records: None,
            }),
            other => other,
        }
    }

    async fn get_deployment_status(&self, deployment_id: &str) -> Result<ReadyState> {
        let deployment: VercelDeployment = self
            .get_json(
                &format!("/v13/deployments/{deployment_id}"),
                ErrorContext::resource(deployment_id),
            )
            .await?;
        Ok(deployment
            .ready_state
            .as_deref()
            .map_or(ReadyState::Queued, ReadyState::parse))
    }

    async fn delete_domain(&self, name: &str, project_id: Option<&str>) -> Result<()> {
        let name = normalize_domain_name(name);
        let path = match project_id {
            Some(project_id) => format!("/v9/projects/{project_id}/domains/{name}"),
            None => format!("/v6/domains/{name}"),
        };

        match self.delete_path(&path, ErrorContext::resource(&name)).await {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("[vercel] {name} was not attached, nothing to remove");
                Ok(())
            }
            other => other,
        }
    }
}
