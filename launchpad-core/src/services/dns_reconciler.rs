//! DNS 记录收敛服务
//!
//! Makes a zone contain the records the hosting platform needs, without
//! duplicating what is already there. Every decision is returned as a
//! [`ReconcileOutcome`]; nothing here fails the caller.

use std::sync::Arc;

use launchpad_provider::{same_host, CreateDnsRecordRequest, DnsProvider, DnsRecord, DnsRecordType, ProviderError};

use crate::services::ServiceContext;
use crate::types::{HostingTargets, LogLevel, ReconcileOutcome};

/// 根域名记录指向托管平台的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApexStrategy {
    Cname,
    ARecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptWhen {
    /// Only if nothing was attempted yet.
    First,
    /// If nothing was attempted yet, or the provider rejected the previous record.
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

const APEX_STRATEGIES: &[(ApexStrategy, AttemptWhen)] = &[
    (ApexStrategy::Cname, AttemptWhen::First),
    (ApexStrategy::ARecord, AttemptWhen::AfterRejection),
];

/// 幂等 DNS 记录收敛
pub struct DnsReconciler {
    dns: Arc<dyn DnsProvider>,
    ttl: u32,
}

impl DnsReconciler {
    /// 创建 DNS 收敛服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            dns: Arc::clone(&ctx.dns_provider),
            ttl: ctx.config.dns.ttl,
        }
    }

    /// 确保 `zone_id` 中存在根域名、`www` 及平台验证记录
    pub async fn ensure(
        &self,
        domain_name: &str,
        zone_id: &str,
        targets: &HostingTargets,
    ) -> Vec<ReconcileOutcome> {
        let records = match self.dns.list_records(zone_id).await {
            Ok(records) => records,
            Err(e) => {
                return vec![ReconcileOutcome::failed(
                    format!("zone {zone_id}"),
                    format!("Could not list records, nothing was changed: {e}"),
                )];
            }
        };

        let mut outcomes = self.ensure_apex(domain_name, zone_id, &records, targets).await;
        let www = format!("www.{domain_name}");
        outcomes.push(self.ensure_www(&www, zone_id, &records, targets).await);
        for required in targets.verification_records() {
            outcomes.push(
                self.ensure_txt(&required.name, &required.value, zone_id, &records)
                    .await,
            );
        }
        outcomes
    }

    async fn ensure_apex(
        &self,
        apex: &str,
        zone_id: &str,
        records: &[DnsRecord],
        targets: &HostingTargets,
    ) -> Vec<ReconcileOutcome> {
        if let Some(existing) = find_pointing(records, apex, targets) {
            return vec![already_present(existing)];
        }

        let mut outcomes: Vec<ReconcileOutcome> = records
            .iter()
            .filter(|r| same_host(&r.name, apex) && r.record_type.is_address_like())
            .map(|r| {
                ReconcileOutcome::skipped(
                    label(r.record_type, apex),
                    format!("Existing record points to {}; left untouched", r.content),
                )
                .with_level(LogLevel::Warning)
            })
            .collect();

        let mut last_error: Option<ProviderError> = None;
        for (strategy, when) in APEX_STRATEGIES {
            if !when.allows(last_error.as_ref()) {
                continue;
            }
            let (record_type, content) = match strategy {
                ApexStrategy::Cname => (DnsRecordType::Cname, targets.cname_target.as_str()),
                ApexStrategy::ARecord => (DnsRecordType::A, targets.apex_ipv4.as_str()),
            };
            match self.create(zone_id, record_type, apex, content).await {
                Ok(_) => {
                    let message = match &last_error {
                        None => format!("Created -> {content}"),
                        Some(e) => format!("Created -> {content} (apex CNAME rejected: {e})"),
                    };
                    outcomes.push(ReconcileOutcome::created(label(record_type, apex), message));
                    return outcomes;
                }
                Err(e) => {
                    log::warn!("Apex {record_type} for {apex} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error.map_or_else(|| "no strategy applied".to_string(), |e| e.to_string());
        outcomes.push(ReconcileOutcome::failed(
            format!("apex {apex}"),
            format!("Could not point apex at the hosting platform: {reason}"),
        ));
        outcomes
    }

    async fn ensure_www(
        &self,
        www: &str,
        zone_id: &str,
        records: &[DnsRecord],
        targets: &HostingTargets,
    ) -> ReconcileOutcome {
        if let Some(existing) = find_pointing(records, www, targets) {
            return already_present(existing);
        }
        let record = label(DnsRecordType::Cname, www);
        match self
            .create(zone_id, DnsRecordType::Cname, www, &targets.cname_target)
            .await
        {
            Ok(_) => ReconcileOutcome::created(record, format!("Created -> {}", targets.cname_target)),
            Err(e) => ReconcileOutcome::failed(record, format!("Create failed: {e}")),
        }
    }

    async fn ensure_txt(
        &self,
        name: &str,
        value: &str,
        zone_id: &str,
        records: &[DnsRecord],
    ) -> ReconcileOutcome {
        let record = label(DnsRecordType::Txt, name);
        let present = records.iter().any(|r| {
            r.record_type == DnsRecordType::Txt
                && same_host(&r.name, name)
                && r.content.trim_matches('"') == value
        });
        if present {
            return ReconcileOutcome::skipped(record, "Verification record already present");
        }
        match self.create(zone_id, DnsRecordType::Txt, name, value).await {
            Ok(_) => ReconcileOutcome::created(record, "Created verification record"),
            Err(e) => ReconcileOutcome::failed(record, format!("Create failed: {e}")),
        }
    }

    async fn create(
        &self,
        zone_id: &str,
        record_type: DnsRecordType,
        name: &str,
        content: &str,
    ) -> Result<DnsRecord, ProviderError> {
        self.dns
            .create_record(&CreateDnsRecordRequest {
                zone_id: zone_id.to_string(),
                record_type,
                name: name.to_string(),
                content: content.to_string(),
                ttl: self.ttl,
                proxied: false,
            })
            .await
    }
}

fn label(record_type: DnsRecordType, name: &str) -> String {
    format!("{record_type} {name}")
}

fn find_pointing<'a>(
    records: &'a [DnsRecord],
    name: &str,
    targets: &HostingTargets,
) -> Option<&'a DnsRecord> {
    records.iter().find(|r| {
        r.record_type.is_address_like() && same_host(&r.name, name) && targets.is_target(&r.content)
    })
}

fn already_present(record: &DnsRecord) -> ReconcileOutcome {
    let outcome = ReconcileOutcome::skipped(
        label(record.record_type, &record.name),
        format!("Already points to {}", record.content),
    );
    if record.proxied {
        ReconcileOutcome {
            message: format!(
                "Already points to {} but is proxied; strict TLS modes can break certificate issuance",
                record.content
            ),
            ..outcome
        }
        .with_level(LogLevel::Warning)
    } else {
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_context;
    use crate::types::ReconcileAction;
    use launchpad_provider::ConfigurationDnsRecord;

    fn targets() -> HostingTargets {
        HostingTargets::new("cname.vercel-dns.com", "76.76.21.21")
    }

    #[test]
    fn attempt_conditions() {
        let rejected = ProviderError::InvalidParameter {
            provider: "mock".into(),
            param: "type".into(),
            detail: "CNAME not allowed at apex".into(),
        };
        let network = ProviderError::NetworkError {
            provider: "mock".into(),
            detail: "reset".into(),
        };
        assert!(AttemptWhen::First.allows(None));
        assert!(!AttemptWhen::First.allows(Some(&rejected)));
        assert!(AttemptWhen::AfterRejection.allows(Some(&rejected)));
        assert!(!AttemptWhen::AfterRejection.allows(Some(&network)));
    }

    #[tokio::test]
    async fn creates_apex_and_www_cnames() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "z1").await;
        let reconciler = DnsReconciler::new(t.ctx.clone());

        let outcomes = reconciler.ensure("example.com", "z1", &targets()).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.action == ReconcileAction::Created));
        let records = t.dns.records("z1").await;
        assert!(records
            .iter()
            .any(|r| r.name == "example.com" && r.record_type == DnsRecordType::Cname));
        assert!(records
            .iter()
            .any(|r| r.name == "www.example.com" && r.content == "cname.vercel-dns.com"));
    }

    #[tokio::test]
    async fn second_run_creates_nothing() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "z1").await;
        let reconciler = DnsReconciler::new(t.ctx.clone());

        reconciler.ensure("example.com", "z1", &targets()).await;
        let before = t.dns.records("z1").await.len();
        let outcomes = reconciler.ensure("example.com", "z1", &targets()).await;

        assert_eq!(t.dns.records("z1").await.len(), before);
        assert!(outcomes.iter().all(|o| o.action == ReconcileAction::Skipped));
    }

    #[tokio::test]
    async fn rejected_apex_cname_falls_back_to_a_record() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "z1").await;
        t.dns.reject_apex_cname(true).await;
        let reconciler = DnsReconciler::new(t.ctx.clone());

        let outcomes = reconciler.ensure("example.com", "z1", &targets()).await;

        let apex = &outcomes[0];
        assert_eq!(apex.action, ReconcileAction::Created);
        assert_eq!(apex.record, "A example.com");
        assert!(apex.message.contains("apex CNAME rejected"));
        assert!(t
            .dns
            .records("z1")
            .await
            .iter()
            .any(|r| r.record_type == DnsRecordType::A && r.content == "76.76.21.21"));
    }

    #[tokio::test]
    async fn transient_apex_failure_does_not_fall_back() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "z1").await;
        t.dns.fail_creates(true).await;
        let reconciler = DnsReconciler::new(t.ctx.clone());

        let outcomes = reconciler.ensure("example.com", "z1", &targets()).await;

        assert!(outcomes.iter().all(|o| o.action == ReconcileAction::Failed));
        assert_eq!(t.dns.create_attempts().await, 2, "one apex CNAME, one www CNAME");
    }

    #[tokio::test]
    async fn existing_target_matches_case_insensitively_and_flags_proxied() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "z1").await;
        t.dns
            .add_record("z1", DnsRecordType::A, "example.com", "76.76.21.21", false)
            .await;
        t.dns
            .add_record("z1", DnsRecordType::Cname, "www.example.com", "CNAME.Vercel-DNS.com.", true)
            .await;
        let reconciler = DnsReconciler::new(t.ctx.clone());

        let outcomes = reconciler.ensure("example.com", "z1", &targets()).await;

        assert_eq!(outcomes[0].action, ReconcileAction::Skipped);
        assert_eq!(outcomes[0].level, LogLevel::Info);
        assert_eq!(outcomes[1].action, ReconcileAction::Skipped);
        assert_eq!(outcomes[1].level, LogLevel::Warning);
        assert!(outcomes[1].message.contains("proxied"));
        assert_eq!(t.dns.records("z1").await.len(), 2);
    }

    #[tokio::test]
    async fn verification_txt_is_created_once() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "z1").await;
        let reconciler = DnsReconciler::new(t.ctx.clone());
        let targets = targets().with_platform_records(vec![ConfigurationDnsRecord {
            record_type: DnsRecordType::Txt,
            name: "_vercel.example.com".into(),
            value: "vc-domain-verify=example.com,123".into(),
        }]);

        let first = reconciler.ensure("example.com", "z1", &targets).await;
        let second = reconciler.ensure("example.com", "z1", &targets).await;

        assert_eq!(first.len(), 3);
        assert_eq!(first[2].action, ReconcileAction::Created);
        assert_eq!(second[2].action, ReconcileAction::Skipped);
    }

    #[tokio::test]
    async fn listing_failure_is_reported_not_raised() {
        let t = create_test_context();
        let reconciler = DnsReconciler::new(t.ctx.clone());

        let outcomes = reconciler.ensure("example.com", "no-such-zone", &targets()).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].action, ReconcileAction::Failed);
    }
}
