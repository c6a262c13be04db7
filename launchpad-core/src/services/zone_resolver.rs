//! DNS Zone 解析服务

use std::sync::Arc;

use launchpad_provider::ErrorKind;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::Domain;

/// Zone id 的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSource {
    Stored,
    Found,
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResolution {
    pub zone_id: String,
    pub source: ZoneSource,
    /// 新建 Zone 需委派的 nameserver
    pub name_servers: Vec<String>,
}

/// 查找（或创建）域名所属的 DNS Zone 并保存其 id
pub struct ZoneResolver {
    ctx: Arc<ServiceContext>,
}

impl ZoneResolver {
    /// 创建 Zone 解析服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 解析域名所属 Zone，成功时更新并保存 `domain.zone_id`
    ///
    /// 依次查找域名本身及其上级域名（至少两级），
    /// 因此 `shop.example.com` 会解析到 `example.com` 的 Zone。
    pub async fn resolve(&self, domain: &mut Domain) -> CoreResult<ZoneResolution> {
        if let Some(zone_id) = domain.zone_id.as_deref().filter(|z| !z.is_empty()) {
            return Ok(ZoneResolution {
                zone_id: zone_id.to_string(),
                source: ZoneSource::Stored,
                name_servers: Vec::new(),
            });
        }

        let resolution = match self.lookup(&domain.name).await? {
            Some(zone_id) => ZoneResolution {
                zone_id,
                source: ZoneSource::Found,
                name_servers: Vec::new(),
            },
            None if self.ctx.config.dns.create_missing_zones => self.create(&domain.name).await?,
            None => {
                return Err(CoreError::ValidationError(format!(
                    "No DNS zone exists for {} and zone creation is disabled",
                    domain.name
                )));
            }
        };

        domain.zone_id = Some(resolution.zone_id.clone());
        domain.touch();
        self.ctx.domain_repository.save(domain).await?;
        log::info!(
            "Zone for {} resolved to {} ({:?})",
            domain.name,
            resolution.zone_id,
            resolution.source
        );
        Ok(resolution)
    }

    async fn lookup(&self, name: &str) -> CoreResult<Option<String>> {
        for candidate in zone_candidates(name) {
            if let Some(zone_id) = self.ctx.dns_provider.find_zone_by_name(candidate).await? {
                return Ok(Some(zone_id));
            }
        }
        Ok(None)
    }

    async fn create(&self, name: &str) -> CoreResult<ZoneResolution> {
        match self.ctx.dns_provider.create_zone(name).await {
            Ok(zone) => {
                log::info!(
                    "Created zone {} for {name}, nameservers: {}",
                    zone.id,
                    zone.name_servers.join(", ")
                );
                Ok(ZoneResolution {
                    zone_id: zone.id,
                    source: ZoneSource::Created,
                    name_servers: zone.name_servers,
                })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::warn!("Zone {name} already exists, looking it up: {e}");
                match self.ctx.dns_provider.find_zone_by_name(name).await? {
                    Some(zone_id) => Ok(ZoneResolution {
                        zone_id,
                        source: ZoneSource::Found,
                        name_servers: Vec::new(),
                    }),
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `a.b.example.com` -> `a.b.example.com`, `b.example.com`, `example.com`.
fn zone_candidates(name: &str) -> impl Iterator<Item = &str> {
    let labels = name.split('.').count();
    let mut rest = Some(name);
    (0..labels.saturating_sub(1)).filter_map(move |_| {
        let current = rest?;
        rest = current.split_once('.').map(|(_, parent)| parent);
        Some(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, seed_domain};

    #[test]
    fn candidates_walk_up_to_two_labels() {
        let c: Vec<_> = zone_candidates("a.b.example.com").collect();
        assert_eq!(c, ["a.b.example.com", "b.example.com", "example.com"]);
        let c: Vec<_> = zone_candidates("example.com").collect();
        assert_eq!(c, ["example.com"]);
    }

    #[tokio::test]
    async fn stored_zone_is_trusted() {
        let t = create_test_context();
        let mut domain = seed_domain(&t.store, "example.com").await;
        domain.zone_id = Some("zone-stored".into());

        let resolution = ZoneResolver::new(t.ctx.clone()).resolve(&mut domain).await.unwrap();
        assert_eq!(resolution.source, ZoneSource::Stored);
        assert_eq!(t.dns.zone_lookups().await, 0);
    }

    #[tokio::test]
    async fn found_zone_is_persisted() {
        let t = create_test_context();
        t.dns.add_zone("example.com", "zone-1").await;
        let mut domain = seed_domain(&t.store, "shop.example.com").await;

        let resolution = ZoneResolver::new(t.ctx.clone()).resolve(&mut domain).await.unwrap();
        assert_eq!(resolution.zone_id, "zone-1");
        assert_eq!(resolution.source, ZoneSource::Found);

        let stored = t.store.domain(&domain.id).await.unwrap();
        assert_eq!(stored.zone_id.as_deref(), Some("zone-1"));
    }

    #[tokio::test]
    async fn missing_zone_is_created() {
        let t = create_test_context();
        let mut domain = seed_domain(&t.store, "example.com").await;

        let resolution = ZoneResolver::new(t.ctx.clone()).resolve(&mut domain).await.unwrap();
        assert_eq!(resolution.source, ZoneSource::Created);
        assert!(!resolution.name_servers.is_empty());
        assert_eq!(domain.zone_id, Some(resolution.zone_id));
    }

    #[tokio::test]
    async fn already_exists_falls_back_to_lookup() {
        let t = create_test_context();
        // Zone becomes visible only after the create call races with another creator.
        t.dns.hide_zone_until_create("example.com", "zone-raced").await;
        let mut domain = seed_domain(&t.store, "example.com").await;

        let resolution = ZoneResolver::new(t.ctx.clone()).resolve(&mut domain).await.unwrap();
        assert_eq!(resolution.zone_id, "zone-raced");
        assert_eq!(resolution.source, ZoneSource::Found);
    }

    #[tokio::test]
    async fn creation_can_be_disabled() {
        let t = create_test_context();
        let mut config = t.ctx.config.clone();
        config.dns.create_missing_zones = false;
        let ctx = t.with_config(config);
        let mut domain = seed_domain(&t.store, "example.com").await;

        let err = ZoneResolver::new(ctx).resolve(&mut domain).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(domain.zone_id.is_none());
    }
}
