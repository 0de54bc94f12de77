use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(University::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(University::UniversityId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(University::Name).string().not_null())
                    .col(
                        ColumnDef::new(University::Domain)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(University::Description).text().null())
                    .col(ColumnDef::new(University::Location).string().null())
                    .col(ColumnDef::new(University::Website).string().null())
                    .col(
                        ColumnDef::new(University::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(University::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(University::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_university_name")
                    .table(University::Table)
                    .col(University::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_university_name")
                    .table(University::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(University::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum University {
    Table,
    UniversityId,
    Name,
    Domain,
    Description,
    Location,
    Website,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
