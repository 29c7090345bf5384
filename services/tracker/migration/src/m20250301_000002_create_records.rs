use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Records::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Records::UserId).integer().not_null())
                    .col(ColumnDef::new(Records::Isbn).string_len(20).not_null())
                    .col(ColumnDef::new(Records::Title).string().not_null())
                    .col(ColumnDef::new(Records::Author).string().null())
                    .col(ColumnDef::new(Records::Cover).string().null())
                    .col(ColumnDef::new(Records::Genre).string().null())
                    .col(
                        ColumnDef::new(Records::Status)
                            .string_len(16)
                            .not_null()
                            .default("reading"),
                    )
                    .col(
                        ColumnDef::new(Records::CurrentPage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Records::TotalPages)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Records::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Records::StoppedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Records::FinishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Records::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Records::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(Index::create().col(Records::UserId).col(Records::Isbn))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Records::Table, Records::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Records::Table)
                    .col(Records::Isbn)
                    .name("idx_records_isbn")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_records_isbn").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Records::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Records {
    Table,
    UserId,
    Isbn,
    Title,
    Author,
    Cover,
    Genre,
    Status,
    CurrentPage,
    TotalPages,
    StartedAt,
    StoppedAt,
    FinishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
