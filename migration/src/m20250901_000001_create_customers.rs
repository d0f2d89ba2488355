use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    SerialNumber,
    SalesPerson,
    SupportPerson,
    StoreName,
    CustomerEmail,
    CustomerPhone,
    AccountId,
    OutletId,
    AddressLine,
    City,
    State,
    Country,
    Gstin,
    SignupDate,
    SignupPack,
    CurrentPlan,
    ValidityTill,
    NextRenewalOn,
    ChannelPartner,
    Status,
    Category,
    ProductName,
    PaidPackAmount,
    PaidSmsAmount,
    PaidWaAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::SerialNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::SalesPerson).string_len(100).null())
                    .col(ColumnDef::new(Customers::SupportPerson).string_len(100).null())
                    .col(ColumnDef::new(Customers::StoreName).string_len(200).not_null())
                    .col(ColumnDef::new(Customers::CustomerEmail).string_len(100).null())
                    .col(ColumnDef::new(Customers::CustomerPhone).string_len(20).null())
                    .col(ColumnDef::new(Customers::AccountId).string_len(50).null())
                    .col(ColumnDef::new(Customers::OutletId).string_len(50).null())
                    .col(ColumnDef::new(Customers::AddressLine).text().null())
                    .col(ColumnDef::new(Customers::City).string_len(100).null())
                    .col(ColumnDef::new(Customers::State).string_len(100).null())
                    .col(ColumnDef::new(Customers::Country).string_len(100).null())
                    .col(ColumnDef::new(Customers::Gstin).string_len(50).null())
                    .col(ColumnDef::new(Customers::SignupDate).date().null())
                    .col(ColumnDef::new(Customers::SignupPack).string_len(100).null())
                    .col(ColumnDef::new(Customers::CurrentPlan).string_len(100).null())
                    .col(ColumnDef::new(Customers::ValidityTill).date().null())
                    .col(ColumnDef::new(Customers::NextRenewalOn).date().null())
                    .col(ColumnDef::new(Customers::ChannelPartner).string_len(100).null())
                    .col(
                        ColumnDef::new(Customers::Status)
                            .string_len(20)
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Customers::Category).string_len(100).null())
                    .col(ColumnDef::new(Customers::ProductName).string_len(200).null())
                    .col(ColumnDef::new(Customers::PaidPackAmount).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Customers::PaidSmsAmount).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Customers::PaidWaAmount).decimal_len(10, 2).null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_customers_status", Customers::Status),
            ("idx_customers_signup_date", Customers::SignupDate),
            ("idx_customers_category", Customers::Category),
            ("idx_customers_next_renewal", Customers::NextRenewalOn),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Customers::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Customers::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
