use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_table("whale").await? {
            manager
                .create_table(
                    Table::create()
                        .table(Whale::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Whale::WhaleId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Whale::Blockchain).string().not_null())
                        .col(ColumnDef::new(Whale::Address).string().not_null())
                        .col(ColumnDef::new(Whale::Owner).string().null())
                        .col(
                            ColumnDef::new(Whale::OwnerType)
                                .string()
                                .not_null()
                                .default("unknown"),
                        )
                        .col(
                            ColumnDef::new(Whale::IsContract)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Whale::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Identity key; the scrape upsert targets it with ON CONFLICT
            manager
                .create_index(
                    Index::create()
                        .name("ux_blockchain_address")
                        .table(Whale::Table)
                        .col(Whale::Blockchain)
                        .col(Whale::Address)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("balance").await? {
            manager
                .create_table(
                    Table::create()
                        .table(Balance::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Balance::BalanceId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Balance::WhaleId).integer().not_null())
                        .col(ColumnDef::new(Balance::Value).double().not_null())
                        .col(ColumnDef::new(Balance::Symbol).string().not_null())
                        .col(
                            ColumnDef::new(Balance::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_balance_whale")
                                .from(Balance::Table, Balance::WhaleId)
                                .to(Whale::Table, Whale::WhaleId)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("balance_whale_created_at")
                        .table(Balance::Table)
                        .col(Balance::WhaleId)
                        .col(Balance::CreatedAt)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("balance_symbol_created_at")
                        .table(Balance::Table)
                        .col(Balance::Symbol)
                        .col(Balance::CreatedAt)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Balance::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Whale::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

// Whale identity table
#[derive(Iden)]
enum Whale {
    Table,
    WhaleId,
    Blockchain,
    Address,
    Owner,
    OwnerType,
    IsContract,
    CreatedAt,
}

// Balance snapshot table
#[derive(Iden)]
enum Balance {
    Table,
    BalanceId,
    WhaleId,
    Value,
    Symbol,
    CreatedAt,
}
