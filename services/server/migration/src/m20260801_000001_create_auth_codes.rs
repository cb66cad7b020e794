use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthCodes::Code)
                            .string_len(12)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::CreatedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::Activated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AuthCodes::ActivationDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(AuthCodes::ActivationIp).string_len(45))
                    .col(ColumnDef::new(AuthCodes::ActivationUserAgent).text())
                    .col(
                        ColumnDef::new(AuthCodes::QueryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AuthCodes::LastQueryDate).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AuthCodes::Table)
                    .col(AuthCodes::Activated)
                    .name("idx_auth_codes_activated")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AuthCodes::Table)
                    .col(AuthCodes::ActivationDate)
                    .name("idx_auth_codes_activation_date")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AuthCodes::Table)
                    .col(AuthCodes::LastQueryDate)
                    .name("idx_auth_codes_last_query_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuthCodes {
    Table,
    Code,
    CreatedDate,
    Activated,
    ActivationDate,
    ActivationIp,
    ActivationUserAgent,
    QueryCount,
    LastQueryDate,
}
