use crate::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create COURSE_LEVEL enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(CourseLevel::Table)
                    .values([
                        CourseLevel::Undergraduate,
                        CourseLevel::Graduate,
                        CourseLevel::Doctoral,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TargetCourse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TargetCourse::CourseId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(TargetCourse::UniversityId).uuid().not_null())
                    .col(ColumnDef::new(TargetCourse::CourseCode).string().not_null())
                    .col(ColumnDef::new(TargetCourse::CourseName).string().not_null())
                    .col(ColumnDef::new(TargetCourse::Department).string().null())
                    .col(
                        ColumnDef::new(TargetCourse::Credits)
                            .double()
                            .not_null()
                            .default(3.0),
                    )
                    .col(
                        ColumnDef::new(TargetCourse::CourseLevel)
                            .enumeration(
                                CourseLevel::Table,
                                [
                                    CourseLevel::Undergraduate,
                                    CourseLevel::Graduate,
                                    CourseLevel::Doctoral,
                                ],
                            )
                            .not_null()
                            .default("undergraduate"),
                    )
                    .col(ColumnDef::new(TargetCourse::Description).text().null())
                    .col(ColumnDef::new(TargetCourse::LearningOutcomes).text().null())
                    .col(ColumnDef::new(TargetCourse::Prerequisites).text().null())
                    .col(
                        ColumnDef::new(TargetCourse::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TargetCourse::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(TargetCourse::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_target_course_university")
                            .from_tbl(TargetCourse::Table)
                            .from_col(TargetCourse::UniversityId)
                            .to_tbl(University::Table)
                            .to_col(University::UniversityId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Course codes are unique within a university
        manager
            .create_index(
                Index::create()
                    .name("idx_target_course_university_code")
                    .table(TargetCourse::Table)
                    .col(TargetCourse::UniversityId)
                    .col(TargetCourse::CourseCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_target_course_is_active")
                    .table(TargetCourse::Table)
                    .col(TargetCourse::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_target_course_is_active")
                    .table(TargetCourse::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_target_course_university_code")
                    .table(TargetCourse::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TargetCourse::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(CourseLevel::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TargetCourse {
    Table,
    CourseId,
    UniversityId,
    CourseCode,
    CourseName,
    Department,
    Credits,
    CourseLevel,
    Description,
    LearningOutcomes,
    Prerequisites,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum University {
    Table,
    UniversityId,
}

#[derive(DeriveIden)]
enum CourseLevel {
    Table,
    Undergraduate,
    Graduate,
    Doctoral,
}
