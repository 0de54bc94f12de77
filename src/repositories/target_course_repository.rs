use crate::entities::sea_orm_active_enums::CourseLevel;
use crate::entities::target_course;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct TargetCourseRepository;

impl TargetCourseRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_id(&self, course_id: Uuid) -> Result<Option<target_course::Model>> {
        let db = self.get_connection();
        let course = target_course::Entity::find_by_id(course_id).one(db).await?;
        Ok(course)
    }

    /// Course codes are unique within a university
    pub async fn find_by_code(
        &self,
        university_id: Uuid,
        course_code: &str,
    ) -> Result<Option<target_course::Model>> {
        let db = self.get_connection();
        let course = target_course::Entity::find()
            .filter(target_course::Column::UniversityId.eq(university_id))
            .filter(target_course::Column::CourseCode.eq(course_code))
            .one(db)
            .await?;
        Ok(course)
    }

    /// Active catalog of one university; inactive entries are excluded from
    /// matching and listings but keep their history.
    pub async fn find_active_by_university(
        &self,
        university_id: Uuid,
        department: Option<String>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<target_course::Model>> {
        let db = self.get_connection();
        let mut query = target_course::Entity::find()
            .filter(target_course::Column::UniversityId.eq(university_id))
            .filter(target_course::Column::IsActive.eq(true));

        if let Some(department) = department {
            query = query.filter(target_course::Column::Department.eq(department));
        }

        let courses = query
            .order_by_asc(target_course::Column::CourseCode)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(courses)
    }

    /// Full active catalog used by a matching run (no pagination)
    pub async fn find_matching_catalog(
        &self,
        university_id: Uuid,
    ) -> Result<Vec<target_course::Model>> {
        let db = self.get_connection();
        let courses = target_course::Entity::find()
            .filter(target_course::Column::UniversityId.eq(university_id))
            .filter(target_course::Column::IsActive.eq(true))
            .order_by_asc(target_course::Column::CourseCode)
            .all(db)
            .await?;
        Ok(courses)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        course_id: Uuid,
        university_id: Uuid,
        course_code: String,
        course_name: String,
        department: Option<String>,
        credits: f64,
        course_level: CourseLevel,
        description: Option<String>,
        learning_outcomes: Option<String>,
        prerequisites: Option<String>,
    ) -> Result<target_course::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();

        let course_model = target_course::ActiveModel {
            course_id: Set(course_id),
            university_id: Set(university_id),
            course_code: Set(course_code),
            course_name: Set(course_name),
            department: Set(department),
            credits: Set(credits),
            course_level: Set(course_level),
            description: Set(description),
            learning_outcomes: Set(learning_outcomes),
            prerequisites: Set(prerequisites),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = course_model.insert(db).await?;
        Ok(result)
    }

    pub async fn update(
        &self,
        course_id: Uuid,
        updates: TargetCourseUpdate,
    ) -> Result<target_course::Model> {
        let course = self
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Course not found"))?;
        let db = self.get_connection();

        let mut active_course: target_course::ActiveModel = course.into();

        if let Some(course_code) = updates.course_code {
            active_course.course_code = Set(course_code);
        }
        if let Some(course_name) = updates.course_name {
            active_course.course_name = Set(course_name);
        }
        if let Some(department) = updates.department {
            active_course.department = Set(Some(department));
        }
        if let Some(credits) = updates.credits {
            active_course.credits = Set(credits);
        }
        if let Some(course_level) = updates.course_level {
            active_course.course_level = Set(course_level);
        }
        if let Some(description) = updates.description {
            active_course.description = Set(Some(description));
        }
        if let Some(learning_outcomes) = updates.learning_outcomes {
            active_course.learning_outcomes = Set(Some(learning_outcomes));
        }
        if let Some(prerequisites) = updates.prerequisites {
            active_course.prerequisites = Set(Some(prerequisites));
        }
        if let Some(is_active) = updates.is_active {
            active_course.is_active = Set(is_active);
        }

        active_course.updated_at = Set(Utc::now().naive_utc());

        let result = active_course.update(db).await?;
        Ok(result)
    }

    /// Catalog entries are referenced by matches and evaluations, so
    /// "delete" only deactivates them.
    pub async fn deactivate(&self, course_id: Uuid) -> Result<target_course::Model> {
        self.update(
            course_id,
            TargetCourseUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn count_active(&self) -> Result<u64> {
        let db = self.get_connection();
        let count = target_course::Entity::find()
            .filter(target_course::Column::IsActive.eq(true))
            .count(db)
            .await?;
        Ok(count)
    }
}

#[derive(Default)]
pub struct TargetCourseUpdate {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub department: Option<String>,
    pub credits: Option<f64>,
    pub course_level: Option<CourseLevel>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub prerequisites: Option<String>,
    pub is_active: Option<bool>,
}
