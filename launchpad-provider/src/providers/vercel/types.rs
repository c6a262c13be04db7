//! Vercel REST API 类型定义

use serde::{Deserialize, Serialize};

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct VercelErrorEnvelope {
    pub error: VercelError,
}

#[derive(Debug, Deserialize)]
pub struct VercelError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct VercelProject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody<'a> {
    pub name: &'a str,
    /// Static output only; explicit `null` disables framework detection.
    pub framework: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<GitRepositoryRef<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GitRepositoryRef<'a> {
    #[serde(rename = "type")]
    pub provider: &'a str,
    pub repo: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddDomainBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'a str>,
}

/// A domain attached to a project.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelProjectDomain {
    pub name: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub verification: Vec<VercelVerification>,
}

#[derive(Debug, Deserialize)]
pub struct VercelVerification {
    #[serde(rename = "type")]
    pub record_type: String,
    pub domain: String,
    pub value: String,
}

/// `GET /v5/domains/{domain}`
#[derive(Debug, Deserialize)]
pub struct VercelDomainEnvelope {
    pub domain: VercelAccountDomain,
}

#[derive(Debug, Deserialize)]
pub struct VercelAccountDomain {
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentBody<'a> {
    pub name: &'a str,
    pub project: &'a str,
    pub target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_source: Option<GitSource<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<InlineFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_settings: Option<ProjectSettings>,
}

#[derive(Debug, Serialize)]
pub struct GitSource<'a> {
    #[serde(rename = "type")]
    pub provider: &'a str,
    pub org: &'a str,
    pub repo: &'a str,
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InlineFile {
    pub file: String,
    pub data: String,
    pub encoding: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProjectSettings {
    pub framework: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelDeployment {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready_state: Option<String>,
    /// Milliseconds since epoch.
    #[serde(default, deserialize_with = "crate::utils::datetime::deserialize")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
