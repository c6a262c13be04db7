//! `SeaORM` entity for the `domain_deployments` table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "domain_deployments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub domain_id: String,
    pub domain_name: String,
    pub deployment_handle: Option<String>,
    pub hosting_project_id: Option<String>,
    pub deployment_url: Option<String>,
    pub status: String,
    /// JSON array of log entries.
    pub logs: String,
    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
