pub mod course_match;
pub mod evaluation;
pub mod sea_orm_active_enums;
pub mod submission;
pub mod target_course;
pub mod transfer_course;
pub mod university;
pub mod user;
