use crate::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create EVALUATION_DECISION enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(EvaluationDecision::Table)
                    .values([
                        EvaluationDecision::Pending,
                        EvaluationDecision::Approved,
                        EvaluationDecision::Rejected,
                        EvaluationDecision::NeedsInfo,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Evaluation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluation::EvaluationId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Evaluation::SubmissionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Evaluation::TransferCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluation::EvaluatorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Evaluation::Decision)
                            .enumeration(
                                EvaluationDecision::Table,
                                [
                                    EvaluationDecision::Pending,
                                    EvaluationDecision::Approved,
                                    EvaluationDecision::Rejected,
                                    EvaluationDecision::NeedsInfo,
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Evaluation::ApprovedTargetCourseId)
                            .uuid()
                            .null(),
                    )
                    .col(ColumnDef::new(Evaluation::Notes).text().null())
                    .col(
                        ColumnDef::new(Evaluation::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Evaluation::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_submission")
                            .from_tbl(Evaluation::Table)
                            .from_col(Evaluation::SubmissionId)
                            .to_tbl(Submission::Table)
                            .to_col(Submission::SubmissionId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_transfer_course")
                            .from_tbl(Evaluation::Table)
                            .from_col(Evaluation::TransferCourseId)
                            .to_tbl(TransferCourse::Table)
                            .to_col(TransferCourse::TransferCourseId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_evaluator")
                            .from_tbl(Evaluation::Table)
                            .from_col(Evaluation::EvaluatorId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_approved_target_course")
                            .from_tbl(Evaluation::Table)
                            .from_col(Evaluation::ApprovedTargetCourseId)
                            .to_tbl(TargetCourse::Table)
                            .to_col(TargetCourse::CourseId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one evaluation per transfer course
        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_transfer_course_id")
                    .table(Evaluation::Table)
                    .col(Evaluation::TransferCourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_submission_id")
                    .table(Evaluation::Table)
                    .col(Evaluation::SubmissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_evaluation_submission_id")
                    .table(Evaluation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_evaluation_transfer_course_id")
                    .table(Evaluation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Evaluation::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(EvaluationDecision::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Evaluation {
    Table,
    EvaluationId,
    SubmissionId,
    TransferCourseId,
    EvaluatorId,
    Decision,
    ApprovedTargetCourseId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    SubmissionId,
}

#[derive(DeriveIden)]
enum TransferCourse {
    Table,
    TransferCourseId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum TargetCourse {
    Table,
    CourseId,
}

#[derive(DeriveIden)]
enum EvaluationDecision {
    Table,
    Pending,
    Approved,
    Rejected,
    NeedsInfo,
}
