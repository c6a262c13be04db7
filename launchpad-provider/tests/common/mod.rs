//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use launchpad_provider::{
    CreateDnsRecordRequest, DnsCredentials, DnsProvider, DnsRecord, DnsRecordType,
    EdgeWorkerApi, HostingCredentials, HostingPlatform, create_dns_clients,
    create_hosting_platform,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_label() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// Cloudflare 测试上下文
pub struct DnsTestContext {
    pub dns: Arc<dyn DnsProvider>,
    pub workers: Option<Arc<dyn EdgeWorkerApi>>,
    pub domain: String,
}

impl DnsTestContext {
    pub fn cloudflare() -> Option<Self> {
        let api_token = env::var("CLOUDFLARE_API_TOKEN").ok()?;
        let account_id = env::var("CLOUDFLARE_ACCOUNT_ID").ok();
        let domain = env::var("TEST_DOMAIN").ok()?;

        let clients = create_dns_clients(DnsCredentials::Cloudflare {
            api_token,
            account_id,
        })
        .ok()?;

        Some(Self {
            dns: clients.dns,
            workers: clients.edge_workers,
            domain,
        })
    }

    pub async fn zone_id(&self) -> Option<String> {
        self.dns.find_zone_by_name(&self.domain).await.ok().flatten()
    }

    /// 创建测试 TXT 记录
    pub async fn create_test_record(&self, zone_id: &str) -> Option<DnsRecord> {
        let request = CreateDnsRecordRequest {
            zone_id: zone_id.to_string(),
            record_type: DnsRecordType::Txt,
            name: format!("{}.{}", generate_test_label(), self.domain),
            content: "integration-test".to_string(),
            ttl: 120,
            proxied: false,
        };
        self.dns.create_record(&request).await.ok()
    }

    /// 查找并清理所有测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self, zone_id: &str) {
        if let Ok(records) = self.dns.list_records(zone_id).await {
            for record in records {
                if record.name.starts_with("_test-") {
                    let _ = self.dns.delete_record(zone_id, &record.id).await;
                }
            }
        }
    }
}

/// Vercel 测试上下文
pub struct HostingTestContext {
    pub platform: Arc<dyn HostingPlatform>,
    pub domain: String,
    pub project_id: Option<String>,
}

impl HostingTestContext {
    pub fn vercel() -> Option<Self> {
        let api_token = env::var("VERCEL_API_TOKEN").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;
        let platform = create_hosting_platform(HostingCredentials::Vercel {
            api_token,
            team_id: env::var("VERCEL_TEAM_ID").ok(),
            git_repository: env::var("VERCEL_GIT_REPOSITORY").ok(),
            git_ref: env::var("VERCEL_GIT_REF").unwrap_or_else(|_| "main".to_string()),
        })
        .ok()?;

        Some(Self {
            platform,
            domain,
            project_id: env::var("VERCEL_PROJECT_ID").ok(),
        })
    }
}
