use crate::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create SUBMISSION_STATUS enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(SubmissionStatus::Table)
                    .values([
                        SubmissionStatus::Draft,
                        SubmissionStatus::Pending,
                        SubmissionStatus::Processing,
                        SubmissionStatus::InReview,
                        SubmissionStatus::Completed,
                        SubmissionStatus::Rejected,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submission::SubmissionId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Submission::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(Submission::TargetUniversityId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submission::TranscriptFilePath)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Submission::Status)
                            .enumeration(
                                SubmissionStatus::Table,
                                [
                                    SubmissionStatus::Draft,
                                    SubmissionStatus::Pending,
                                    SubmissionStatus::Processing,
                                    SubmissionStatus::InReview,
                                    SubmissionStatus::Completed,
                                    SubmissionStatus::Rejected,
                                ],
                            )
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Submission::Notes).text().null())
                    .col(
                        ColumnDef::new(Submission::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Submission::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_student")
                            .from_tbl(Submission::Table)
                            .from_col(Submission::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_target_university")
                            .from_tbl(Submission::Table)
                            .from_col(Submission::TargetUniversityId)
                            .to_tbl(University::Table)
                            .to_col(University::UniversityId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransferCourse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransferCourse::TransferCourseId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(
                        ColumnDef::new(TransferCourse::SubmissionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransferCourse::CourseCode).string().null())
                    .col(
                        ColumnDef::new(TransferCourse::CourseName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransferCourse::Credits).double().null())
                    .col(ColumnDef::new(TransferCourse::Grade).string().null())
                    .col(
                        ColumnDef::new(TransferCourse::SourceUniversityName)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TransferCourse::SyllabusFilePath)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(TransferCourse::Description).text().null())
                    .col(
                        ColumnDef::new(TransferCourse::LearningOutcomes)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TransferCourse::AdditionalNotes)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TransferCourse::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(TransferCourse::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_course_submission")
                            .from_tbl(TransferCourse::Table)
                            .from_col(TransferCourse::SubmissionId)
                            .to_tbl(Submission::Table)
                            .to_col(Submission::SubmissionId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_student_id")
                    .table(Submission::Table)
                    .col(Submission::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_status")
                    .table(Submission::Table)
                    .col(Submission::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfer_course_submission_id")
                    .table(TransferCourse::Table)
                    .col(TransferCourse::SubmissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transfer_course_submission_id")
                    .table(TransferCourse::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_submission_status")
                    .table(Submission::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_submission_student_id")
                    .table(Submission::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TransferCourse::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(SubmissionStatus::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    SubmissionId,
    StudentId,
    TargetUniversityId,
    TranscriptFilePath,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TransferCourse {
    Table,
    TransferCourseId,
    SubmissionId,
    CourseCode,
    CourseName,
    Credits,
    Grade,
    SourceUniversityName,
    SyllabusFilePath,
    Description,
    LearningOutcomes,
    AdditionalNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum University {
    Table,
    UniversityId,
}

#[derive(DeriveIden)]
enum SubmissionStatus {
    Table,
    Draft,
    Pending,
    Processing,
    InReview,
    Completed,
    Rejected,
}
