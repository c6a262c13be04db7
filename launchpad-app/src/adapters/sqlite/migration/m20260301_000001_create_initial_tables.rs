use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // domains 表
        manager
            .create_table(
                Table::create()
                    .table(Domain::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Domain::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Domain::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Domain::DnsManagement)
                            .string()
                            .not_null()
                            .default("provider_managed"),
                    )
                    .col(ColumnDef::new(Domain::ZoneId).string().null())
                    .col(
                        ColumnDef::new(Domain::IsActive)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Domain::VerificationStatus)
                            .string()
                            .not_null()
                            .default("not_registered"),
                    )
                    .col(
                        ColumnDef::new(Domain::DeploymentStatus)
                            .string()
                            .not_null()
                            .default("not_deployed"),
                    )
                    .col(ColumnDef::new(Domain::DeploymentUrl).string().null())
                    .col(ColumnDef::new(Domain::HostingProjectId).string().null())
                    .col(ColumnDef::new(Domain::LastDeployedAt).string().null())
                    .col(ColumnDef::new(Domain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Domain::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // domain_deployments 表
        manager
            .create_table(
                Table::create()
                    .table(DomainDeployment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainDeployment::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DomainDeployment::DomainId).string().not_null())
                    .col(ColumnDef::new(DomainDeployment::DomainName).string().not_null())
                    .col(ColumnDef::new(DomainDeployment::DeploymentHandle).string().null())
                    .col(ColumnDef::new(DomainDeployment::HostingProjectId).string().null())
                    .col(ColumnDef::new(DomainDeployment::DeploymentUrl).string().null())
                    .col(ColumnDef::new(DomainDeployment::Status).string().not_null())
                    .col(
                        ColumnDef::new(DomainDeployment::Logs)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(DomainDeployment::CreatedAt).string().not_null())
                    .col(ColumnDef::new(DomainDeployment::CompletedAt).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_domain_deployments_domain_id")
                    .table(DomainDeployment::Table)
                    .col(DomainDeployment::DomainId)
                    .col(DomainDeployment::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // landing_pages 表
        manager
            .create_table(
                Table::create()
                    .table(LandingPage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LandingPage::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LandingPage::DomainId).string().not_null())
                    .col(ColumnDef::new(LandingPage::Subdomain).string().null())
                    .col(ColumnDef::new(LandingPage::HostingProjectId).string().null())
                    .col(ColumnDef::new(LandingPage::ScreenshotKey).string().null())
                    .col(ColumnDef::new(LandingPage::WorkerScript).string().null())
                    .col(ColumnDef::new(LandingPage::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_landing_pages_domain_id")
                    .table(LandingPage::Table)
                    .col(LandingPage::DomainId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LandingPage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DomainDeployment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Domain::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Domain {
    #[sea_orm(iden = "domains")]
    Table,
    Id,
    Name,
    DnsManagement,
    ZoneId,
    IsActive,
    VerificationStatus,
    DeploymentStatus,
    DeploymentUrl,
    HostingProjectId,
    LastDeployedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DomainDeployment {
    #[sea_orm(iden = "domain_deployments")]
    Table,
    Id,
    DomainId,
    DomainName,
    DeploymentHandle,
    HostingProjectId,
    DeploymentUrl,
    Status,
    Logs,
    CreatedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum LandingPage {
    #[sea_orm(iden = "landing_pages")]
    Table,
    Id,
    DomainId,
    Subdomain,
    HostingProjectId,
    ScreenshotKey,
    WorkerScript,
    CreatedAt,
}
