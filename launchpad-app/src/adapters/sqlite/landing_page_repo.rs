//! `LandingPageRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use launchpad_core::error::CoreResult;
use launchpad_core::traits::LandingPageRepository;
use launchpad_core::types::LandingPage;

use super::entity::landing_page;
use super::{SqliteStore, db_error, format_timestamp, parse_timestamp};

impl landing_page::Model {
    fn into_landing_page(self) -> CoreResult<LandingPage> {
        Ok(LandingPage {
            created_at: parse_timestamp("created_at", &self.created_at)?,
            id: self.id,
            domain_id: self.domain_id,
            subdomain: self.subdomain,
            hosting_project_id: self.hosting_project_id,
            screenshot_key: self.screenshot_key,
            worker_script: self.worker_script,
        })
    }
}

#[async_trait]
impl LandingPageRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<LandingPage>> {
        let row = landing_page::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("query landing page"))?;

        row.map(landing_page::Model::into_landing_page).transpose()
    }

    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<LandingPage>> {
        let rows = landing_page::Entity::find()
            .filter(landing_page::Column::DomainId.eq(domain_id))
            .order_by_asc(landing_page::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("query landing pages"))?;

        rows.into_iter()
            .map(landing_page::Model::into_landing_page)
            .collect()
    }

    async fn save(&self, page: &LandingPage) -> CoreResult<()> {
        let active_model = landing_page::ActiveModel {
            id: Set(page.id.clone()),
            domain_id: Set(page.domain_id.clone()),
            subdomain: Set(page.subdomain.clone()),
            hosting_project_id: Set(page.hosting_project_id.clone()),
            screenshot_key: Set(page.screenshot_key.clone()),
            worker_script: Set(page.worker_script.clone()),
            created_at: Set(format_timestamp(&page.created_at)),
        };

        landing_page::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(landing_page::Column::Id)
                    .update_columns([
                        landing_page::Column::Subdomain,
                        landing_page::Column::HostingProjectId,
                        landing_page::Column::ScreenshotKey,
                        landing_page::Column::WorkerScript,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_error("save landing page"))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        let result = landing_page::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("delete landing page"))?;

        Ok(result.rows_affected > 0)
    }
}
