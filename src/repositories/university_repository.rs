use crate::entities::university;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct UniversityRepository;

impl UniversityRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_active(&self, offset: u64, limit: u64) -> Result<Vec<university::Model>> {
        let db = self.get_connection();
        let universities = university::Entity::find()
            .filter(university::Column::IsActive.eq(true))
            .order_by_asc(university::Column::Name)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(universities)
    }

    pub async fn find_by_id(&self, university_id: Uuid) -> Result<Option<university::Model>> {
        let db = self.get_connection();
        let university = university::Entity::find_by_id(university_id).one(db).await?;
        Ok(university)
    }

    pub async fn find_by_domain(&self, domain: &str) -> Result<Option<university::Model>> {
        let db = self.get_connection();
        let university = university::Entity::find()
            .filter(university::Column::Domain.eq(domain))
            .one(db)
            .await?;
        Ok(university)
    }

    pub async fn create(
        &self,
        university_id: Uuid,
        name: String,
        domain: String,
        description: Option<String>,
        location: Option<String>,
        website: Option<String>,
    ) -> Result<university::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();

        let university_model = university::ActiveModel {
            university_id: Set(university_id),
            name: Set(name),
            domain: Set(domain),
            description: Set(description),
            location: Set(location),
            website: Set(website),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = university_model.insert(db).await?;
        Ok(result)
    }

    pub async fn count_active(&self) -> Result<u64> {
        let db = self.get_connection();
        let count = university::Entity::find()
            .filter(university::Column::IsActive.eq(true))
            .count(db)
            .await?;
        Ok(count)
    }
}
