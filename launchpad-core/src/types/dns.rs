//! DNS 目标类型定义

use launchpad_provider::{same_host, ConfigurationDnsRecord, DnsRecordType};

/// What a domain's records must point at for the hosting platform to serve it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostingTargets {
    /// CNAME target for `www` (and apex when the provider allows it)
    pub cname_target: String,
    /// Anycast address for an apex A record
    pub apex_ipv4: String,
    /// Other contents that also count as "already pointing at the platform"
    pub known_targets: Vec<String>,
    /// Records the platform asked for (TXT verification, routing hints)
    pub platform_records: Vec<ConfigurationDnsRecord>,
}

impl HostingTargets {
    pub fn new(cname_target: impl Into<String>, apex_ipv4: impl Into<String>) -> Self {
        Self {
            cname_target: cname_target.into(),
            apex_ipv4: apex_ipv4.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_known_targets(mut self, targets: impl IntoIterator<Item = String>) -> Self {
        self.known_targets.extend(targets);
        self
    }

    /// Adds platform-reported records; their CNAME/A values become known targets.
    #[must_use]
    pub fn with_platform_records(mut self, records: Vec<ConfigurationDnsRecord>) -> Self {
        for record in &records {
            if record.record_type.is_address_like() && !self.is_target(&record.value) {
                self.known_targets.push(record.value.clone());
            }
        }
        self.platform_records.extend(records);
        self
    }

    /// Whether `content` resolves to the hosting platform.
    pub fn is_target(&self, content: &str) -> bool {
        same_host(content, &self.cname_target)
            || same_host(content, &self.apex_ipv4)
            || self.known_targets.iter().any(|t| same_host(content, t))
    }

    /// TXT records the platform requires for ownership verification.
    pub fn verification_records(&self) -> impl Iterator<Item = &ConfigurationDnsRecord> {
        self.platform_records
            .iter()
            .filter(|r| r.record_type == DnsRecordType::Txt)
    }
}
