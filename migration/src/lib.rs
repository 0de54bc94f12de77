pub use sea_orm_migration::prelude::*;

mod m20260712_000001_create_table_university;
mod m20260712_000002_create_table_users;
mod m20260713_101500_create_table_target_course;
mod m20260714_143000_create_table_submission;
mod m20260715_091200_create_table_course_match;
mod m20260715_160400_create_table_evaluation;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_000001_create_table_university::Migration),
            Box::new(m20260712_000002_create_table_users::Migration),
            Box::new(m20260713_101500_create_table_target_course::Migration),
            Box::new(m20260714_143000_create_table_submission::Migration),
            Box::new(m20260715_091200_create_table_course_match::Migration),
            Box::new(m20260715_160400_create_table_evaluation::Migration),
        ]
    }
}
