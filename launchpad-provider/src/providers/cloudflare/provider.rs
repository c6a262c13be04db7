//! Cloudflare DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_domain_name;
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{CreateDnsRecordRequest, DnsRecord, DnsRecordType, ProviderZone};

use super::types::{AccountRef, CreateRecordBody, CreateZoneBody};
use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareZone, MAX_PAGE_SIZE_RECORDS};

/// Safety stop for zones with absurd record counts.
const MAX_RECORD_PAGES: u32 = 100;

impl CloudflareProvider {
    fn to_dns_record(cf_record: CloudflareDnsRecord, zone_id: &str) -> DnsRecord {
        let record_type = serde_json::from_value(serde_json::Value::String(
            cf_record.record_type.to_ascii_uppercase(),
        ))
        .unwrap_or(DnsRecordType::Other);

        DnsRecord {
            id: cf_record.id,
            zone_id: zone_id.to_string(),
            record_type,
            name: normalize_domain_name(&cf_record.name),
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied.unwrap_or(false),
        }
    }

    fn to_provider_zone(zone: CloudflareZone) -> ProviderZone {
        ProviderZone {
            id: zone.id,
            name: zone.name,
            status: zone.status,
            name_servers: zone.name_servers,
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let path =
                format!("/zones/{zone_id}/dns_records?page={page}&per_page={MAX_PAGE_SIZE_RECORDS}");
            let (batch, info): (Vec<CloudflareDnsRecord>, _) = self
                .get_page(&path, ErrorContext::resource(zone_id))
                .await?;
            let fetched = batch.len();
            records.extend(batch.into_iter().map(|r| Self::to_dns_record(r, zone_id)));

            let has_more = match info {
                Some(info) => info.page < info.total_pages,
                None => u32::try_from(fetched).unwrap_or(u32::MAX) >= MAX_PAGE_SIZE_RECORDS,
            };
            if !has_more || fetched == 0 || page >= MAX_RECORD_PAGES {
                break;
            }
            page += 1;
        }

        log::debug!(
            "[cloudflare] zone {zone_id}: {} records across {page} page(s)",
            records.len()
        );
        Ok(records)
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord> {
        if req.record_type == DnsRecordType::Other {
            return Err(ProviderError::Unsupported {
                provider: self.provider_name().to_string(),
                detail: format!("cannot create record of unknown type for {}", req.name),
            });
        }

        let body = CreateRecordBody {
            record_type: req.record_type.as_str(),
            name: &req.name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
        };

        let created: CloudflareDnsRecord = self
            .post(
                &format!("/zones/{}/dns_records", req.zone_id),
                &body,
                ErrorContext::record(&req.name),
            )
            .await?;

        Ok(Self::to_dns_record(created, &req.zone_id))
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            ErrorContext::record_id(record_id),
        )
        .await
    }

    async fn find_zone_by_name(&self, name: &str) -> Result<Option<String>> {
        let name = normalize_domain_name(name);
        let path = format!("/zones?name={}", urlencoding::encode(&name));
        let (zones, _): (Vec<CloudflareZone>, _) = self
            .get_page(&path, ErrorContext::resource(&name))
            .await?;

        Ok(zones
            .into_iter()
            .find(|zone| normalize_domain_name(&zone.name) == name)
            .map(|zone| zone.id))
    }

    async fn create_zone(&self, name: &str) -> Result<ProviderZone> {
        let Some(account_id) = self.account_id.as_deref() else {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "account_id".to_string(),
                detail: "an account id is required to create zones".to_string(),
            });
        };

        let name = normalize_domain_name(name);
        let body = CreateZoneBody {
            name: &name,
            account: AccountRef { id: account_id },
            zone_type: "full",
        };

        let zone: CloudflareZone = self
            .post("/zones", &body, ErrorContext::resource(&name))
            .await?;
        log::info!(
            "[cloudflare] Created zone {} ({}), nameservers: {}",
            zone.name,
            zone.id,
            zone.name_servers.join(", ")
        );
        Ok(Self::to_provider_zone(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_records_with_normalized_names() {
        let record = CloudflareProvider::to_dns_record(
            CloudflareDnsRecord {
                id: "rec-1".into(),
                record_type: "cname".into(),
                name: "WWW.Example.com.".into(),
                content: "cname.vercel-dns.com".into(),
                ttl: 1,
                proxied: None,
            },
            "zone-1",
        );
        assert_eq!(record.record_type, DnsRecordType::Cname);
        assert_eq!(record.name, "www.example.com");
        assert_eq!(record.zone_id, "zone-1");
        assert!(!record.proxied);
    }

    #[test]
    fn unknown_record_types_are_kept_as_other() {
        let record = CloudflareProvider::to_dns_record(
            CloudflareDnsRecord {
                id: "rec-2".into(),
                record_type: "HTTPS".into(),
                name: "example.com".into(),
                content: "1 . alpn=h2".into(),
                ttl: 300,
                proxied: Some(false),
            },
            "zone-1",
        );
        assert_eq!(record.record_type, DnsRecordType::Other);
    }

    #[tokio::test]
    async fn create_zone_requires_account_id() {
        let provider = CloudflareProvider::new("token".into(), None);
        let result = provider.create_zone("example.com").await;
        assert!(
            matches!(&result, Err(ProviderError::InvalidParameter { param, .. }) if param == "account_id"),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn create_record_rejects_unknown_type() {
        let provider = CloudflareProvider::new("token".into(), None);
        let result = provider
            .create_record(&CreateDnsRecordRequest {
                zone_id: "zone-1".into(),
                record_type: DnsRecordType::Other,
                name: "example.com".into(),
                content: "x".into(),
                ttl: 1,
                proxied: false,
            })
            .await;
        assert!(matches!(result, Err(ProviderError::Unsupported { .. })));
    }
}
