use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::UserPreferences;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(UserPreferences::Table)
        .col(
            ColumnDef::new(UserPreferences::UserId)
                .string()
                .not_null()
                .string_len(64)
                .primary_key(),
        )
        .col(ColumnDef::new(UserPreferences::Diet).string().null())
        .col(ColumnDef::new(UserPreferences::Allergies).text().null())
        .col(ColumnDef::new(UserPreferences::BudgetLimit).double().null())
        .col(ColumnDef::new(UserPreferences::MaxPrepMinutes).integer().null())
        .col(ColumnDef::new(UserPreferences::Pantry).text().null())
        .col(
            ColumnDef::new(UserPreferences::UpdatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(UserPreferences::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
