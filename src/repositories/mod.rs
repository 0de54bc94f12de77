pub mod course_match_repository;
pub mod evaluation_repository;
pub mod submission_repository;
pub mod target_course_repository;
pub mod university_repository;
pub mod user_repository;

pub use course_match_repository::{CourseMatchRepository, NewCourseMatch};
pub use evaluation_repository::EvaluationRepository;
pub use submission_repository::{NewTransferCourse, StatusWrite, SubmissionRepository};
pub use target_course_repository::{TargetCourseRepository, TargetCourseUpdate};
pub use university_repository::UniversityRepository;
pub use user_repository::{UserRepository, UserUpdate};
