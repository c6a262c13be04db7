//! `DomainRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use launchpad_core::error::CoreResult;
use launchpad_core::traits::DomainRepository;
use launchpad_core::types::{Domain, VerificationStatus};

use super::entity::domain;
use super::{SqliteStore, db_error, format_timestamp, parse_enum, parse_timestamp};

impl domain::Model {
    /// Convert a `SeaORM` row model into a `Domain`.
    fn into_domain(self) -> CoreResult<Domain> {
        Ok(Domain {
            dns_management: parse_enum("dns_management", self.dns_management)?,
            deployment_status: parse_enum("deployment_status", self.deployment_status)?,
            verification_status: VerificationStatus::parse(&self.verification_status),
            last_deployed_at: self
                .last_deployed_at
                .as_deref()
                .map(|raw| parse_timestamp("last_deployed_at", raw))
                .transpose()?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
            id: self.id,
            name: self.name,
            zone_id: self.zone_id,
            is_active: self.is_active != 0,
            deployment_url: self.deployment_url,
            hosting_project_id: self.hosting_project_id,
        })
    }
}

fn domain_to_active_model(domain: &Domain) -> domain::ActiveModel {
    domain::ActiveModel {
        id: Set(domain.id.clone()),
        name: Set(domain.name.clone()),
        dns_management: Set(enum_str(&domain.dns_management)),
        zone_id: Set(domain.zone_id.clone()),
        is_active: Set(i32::from(domain.is_active)),
        verification_status: Set(domain.verification_status.as_str().to_string()),
        deployment_status: Set(domain.deployment_status.as_str().to_string()),
        deployment_url: Set(domain.deployment_url.clone()),
        hosting_project_id: Set(domain.hosting_project_id.clone()),
        last_deployed_at: Set(domain.last_deployed_at.as_ref().map(format_timestamp)),
        created_at: Set(format_timestamp(&domain.created_at)),
        updated_at: Set(format_timestamp(&domain.updated_at)),
    }
}

/// Serde string form of a unit-variant enum.
fn enum_str<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

#[async_trait]
impl DomainRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>> {
        let row = domain::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("query domain"))?;

        row.map(domain::Model::into_domain).transpose()
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<Domain>> {
        let row = domain::Entity::find()
            .filter(domain::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_error("query domain"))?;

        row.map(domain::Model::into_domain).transpose()
    }

    async fn find_all(&self) -> CoreResult<Vec<Domain>> {
        let rows = domain::Entity::find()
            .order_by_asc(domain::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("query domains"))?;

        rows.into_iter().map(domain::Model::into_domain).collect()
    }

    async fn save(&self, domain: &Domain) -> CoreResult<()> {
        domain::Entity::insert(domain_to_active_model(domain))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(domain::Column::Id)
                    .update_columns([
                        domain::Column::Name,
                        domain::Column::DnsManagement,
                        domain::Column::ZoneId,
                        domain::Column::IsActive,
                        domain::Column::VerificationStatus,
                        domain::Column::DeploymentStatus,
                        domain::Column::DeploymentUrl,
                        domain::Column::HostingProjectId,
                        domain::Column::LastDeployedAt,
                        domain::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_error("save domain"))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        let result = domain::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("delete domain"))?;

        Ok(result.rows_affected > 0)
    }
}
