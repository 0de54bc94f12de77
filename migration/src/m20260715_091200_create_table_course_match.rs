use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseMatch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseMatch::MatchId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(
                        ColumnDef::new(CourseMatch::TransferCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseMatch::TargetCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseMatch::SimilarityScore)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseMatch::Explanation).text().null())
                    .col(ColumnDef::new(CourseMatch::KeySimilarities).json().null())
                    .col(
                        ColumnDef::new(CourseMatch::ImportantDifferences)
                            .json()
                            .null(),
                    )
                    .col(ColumnDef::new(CourseMatch::Recommendation).text().null())
                    .col(ColumnDef::new(CourseMatch::Rank).integer().not_null())
                    .col(
                        ColumnDef::new(CourseMatch::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_match_transfer_course")
                            .from_tbl(CourseMatch::Table)
                            .from_col(CourseMatch::TransferCourseId)
                            .to_tbl(TransferCourse::Table)
                            .to_col(TransferCourse::TransferCourseId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_match_target_course")
                            .from_tbl(CourseMatch::Table)
                            .from_col(CourseMatch::TargetCourseId)
                            .to_tbl(TargetCourse::Table)
                            .to_col(TargetCourse::CourseId)
                            // Catalog entries are deactivated, never deleted, while referenced
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_match_transfer_course_id")
                    .table(CourseMatch::Table)
                    .col(CourseMatch::TransferCourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_course_match_transfer_course_id")
                    .table(CourseMatch::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CourseMatch::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CourseMatch {
    Table,
    MatchId,
    TransferCourseId,
    TargetCourseId,
    SimilarityScore,
    Explanation,
    KeySimilarities,
    ImportantDifferences,
    Recommendation,
    Rank,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TransferCourse {
    Table,
    TransferCourseId,
}

#[derive(DeriveIden)]
enum TargetCourse {
    Table,
    CourseId,
}
