//! `DeploymentRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set,
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::Expr,
};

use launchpad_core::error::{CoreError, CoreResult};
use launchpad_core::traits::DeploymentRepository;
use launchpad_core::types::{AttemptStatus, DeploymentLogEntry, DeploymentStatus, DomainDeployment};

use super::entity::{domain, domain_deployment};
use super::{SqliteStore, db_error, format_timestamp, parse_enum, parse_timestamp};

const TERMINAL_STATUSES: [AttemptStatus; 2] = [AttemptStatus::Deployed, AttemptStatus::Failed];
const IN_FLIGHT_STATUSES: [AttemptStatus; 2] = [AttemptStatus::Pending, AttemptStatus::Deploying];

impl domain_deployment::Model {
    fn into_deployment(self) -> CoreResult<DomainDeployment> {
        let logs: Vec<DeploymentLogEntry> = serde_json::from_str(&self.logs)
            .map_err(|e| CoreError::SerializationError(format!("Invalid logs JSON: {e}")))?;

        Ok(DomainDeployment {
            status: parse_enum("status", self.status)?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            completed_at: self
                .completed_at
                .as_deref()
                .map(|raw| parse_timestamp("completed_at", raw))
                .transpose()?,
            logs,
            id: self.id,
            domain_id: self.domain_id,
            domain_name: self.domain_name,
            deployment_handle: self.deployment_handle,
            hosting_project_id: self.hosting_project_id,
            deployment_url: self.deployment_url,
        })
    }
}

fn deployment_to_active_model(
    deployment: &DomainDeployment,
) -> CoreResult<domain_deployment::ActiveModel> {
    let logs = serde_json::to_string(&deployment.logs)
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;

    Ok(domain_deployment::ActiveModel {
        id: Set(deployment.id.clone()),
        domain_id: Set(deployment.domain_id.clone()),
        domain_name: Set(deployment.domain_name.clone()),
        deployment_handle: Set(deployment.deployment_handle.clone()),
        hosting_project_id: Set(deployment.hosting_project_id.clone()),
        deployment_url: Set(deployment.deployment_url.clone()),
        status: Set(deployment.status.as_str().to_string()),
        logs: Set(logs),
        created_at: Set(format_timestamp(&deployment.created_at)),
        completed_at: Set(deployment.completed_at.as_ref().map(format_timestamp)),
    })
}

fn status_strs(statuses: [AttemptStatus; 2]) -> [&'static str; 2] {
    statuses.map(AttemptStatus::as_str)
}

#[async_trait]
impl DeploymentRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainDeployment>> {
        let row = domain_deployment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("query deployment"))?;

        row.map(domain_deployment::Model::into_deployment).transpose()
    }

    async fn find_latest(&self, domain_id: &str) -> CoreResult<Option<DomainDeployment>> {
        let row = domain_deployment::Entity::find()
            .filter(domain_deployment::Column::DomainId.eq(domain_id))
            .order_by_desc(domain_deployment::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_error("query deployment"))?;

        row.map(domain_deployment::Model::into_deployment).transpose()
    }

    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<DomainDeployment>> {
        let rows = domain_deployment::Entity::find()
            .filter(domain_deployment::Column::DomainId.eq(domain_id))
            .order_by_desc(domain_deployment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("query deployments"))?;

        rows.into_iter()
            .map(domain_deployment::Model::into_deployment)
            .collect()
    }

    async fn find_in_flight(&self) -> CoreResult<Vec<DomainDeployment>> {
        let rows = domain_deployment::Entity::find()
            .filter(domain_deployment::Column::Status.is_in(status_strs(IN_FLIGHT_STATUSES)))
            .order_by_asc(domain_deployment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("query in-flight deployments"))?;

        rows.into_iter()
            .map(domain_deployment::Model::into_deployment)
            .collect()
    }

    async fn save(&self, deployment: &DomainDeployment) -> CoreResult<()> {
        let active_model = deployment_to_active_model(deployment)?;

        domain_deployment::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(domain_deployment::Column::Id)
                    .update_columns([
                        domain_deployment::Column::DeploymentHandle,
                        domain_deployment::Column::HostingProjectId,
                        domain_deployment::Column::DeploymentUrl,
                        domain_deployment::Column::Status,
                        domain_deployment::Column::Logs,
                        domain_deployment::Column::CompletedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_error("save deployment"))?;

        Ok(())
    }

    async fn append_log(&self, id: &str, entry: &DeploymentLogEntry) -> CoreResult<()> {
        let txn = self.db.begin().await.map_err(db_error("begin transaction"))?;

        let row = domain_deployment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("query deployment"))?
            .ok_or_else(|| CoreError::DeploymentNotFound(id.to_string()))?;

        let mut logs: Vec<DeploymentLogEntry> = serde_json::from_str(&row.logs)
            .map_err(|e| CoreError::SerializationError(format!("Invalid logs JSON: {e}")))?;
        logs.push(entry.clone());
        let logs = serde_json::to_string(&logs)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        domain_deployment::Entity::update_many()
            .col_expr(domain_deployment::Column::Logs, Expr::value(logs))
            .filter(domain_deployment::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error("append deployment log"))?;

        txn.commit().await.map_err(db_error("commit transaction"))
    }

    async fn set_status(
        &self,
        id: &str,
        status: AttemptStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> CoreResult<()> {
        let mut update = domain_deployment::Entity::update_many()
            .col_expr(domain_deployment::Column::Status, Expr::value(status.as_str()))
            .filter(domain_deployment::Column::Id.eq(id));
        if let Some(at) = completed_at {
            update = update.col_expr(
                domain_deployment::Column::CompletedAt,
                Expr::value(format_timestamp(&at)),
            );
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(db_error("update deployment status"))?;
        if result.rows_affected == 0 {
            return Err(CoreError::DeploymentNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn begin_deployment(&self, deployment: &DomainDeployment) -> CoreResult<bool> {
        let active_model = deployment_to_active_model(deployment)?;
        let txn = self.db.begin().await.map_err(db_error("begin transaction"))?;

        let exists = domain::Entity::find_by_id(deployment.domain_id.as_str())
            .one(&txn)
            .await
            .map_err(db_error("query domain"))?
            .is_some();
        if !exists {
            return Err(CoreError::DomainNotFound(deployment.domain_id.clone()));
        }

        // Conditional flip: zero rows means another attempt already holds the domain.
        let claimed = domain::Entity::update_many()
            .col_expr(
                domain::Column::DeploymentStatus,
                Expr::value(DeploymentStatus::Deploying.as_str()),
            )
            .col_expr(
                domain::Column::UpdatedAt,
                Expr::value(format_timestamp(&Utc::now())),
            )
            .filter(domain::Column::Id.eq(&deployment.domain_id))
            .filter(domain::Column::DeploymentStatus.ne(DeploymentStatus::Deploying.as_str()))
            .exec(&txn)
            .await
            .map_err(db_error("claim domain"))?;
        if claimed.rows_affected == 0 {
            txn.rollback().await.map_err(db_error("roll back transaction"))?;
            return Ok(false);
        }

        domain_deployment::Entity::insert(active_model)
            .exec(&txn)
            .await
            .map_err(db_error("insert deployment"))?;

        txn.commit().await.map_err(db_error("commit transaction"))?;
        Ok(true)
    }

    async fn prune_history(&self, domain_id: &str, keep: usize) -> CoreResult<usize> {
        let terminal: Vec<String> = domain_deployment::Entity::find()
            .select_only()
            .column(domain_deployment::Column::Id)
            .filter(domain_deployment::Column::DomainId.eq(domain_id))
            .filter(domain_deployment::Column::Status.is_in(status_strs(TERMINAL_STATUSES)))
            .order_by_desc(domain_deployment::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("query deployment history"))?;
        let doomed: Vec<String> = terminal.into_iter().skip(keep).collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        let result = domain_deployment::Entity::delete_many()
            .filter(domain_deployment::Column::Id.is_in(doomed))
            .exec(&self.db)
            .await
            .map_err(db_error("prune deployment history"))?;

        Ok(usize::try_from(result.rows_affected).unwrap_or(usize::MAX))
    }

    async fn delete_by_domain(&self, domain_id: &str) -> CoreResult<usize> {
        let result = domain_deployment::Entity::delete_many()
            .filter(domain_deployment::Column::DomainId.eq(domain_id))
            .exec(&self.db)
            .await
            .map_err(db_error("delete deployments"))?;

        Ok(usize::try_from(result.rows_affected).unwrap_or(usize::MAX))
    }
}
