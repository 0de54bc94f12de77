use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>> {
        let db = self.get_connection();
        let user = user::Entity::find_by_id(user_id).one(db).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let db = self.get_connection();
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?;
        Ok(user)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: Uuid,
        email: String,
        hashed_password: String,
        first_name: String,
        last_name: String,
        role: RoleEnum,
        university_id: Option<Uuid>,
        is_verified: bool,
    ) -> Result<user::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();

        let user_model = user::ActiveModel {
            user_id: Set(user_id),
            email: Set(email),
            password: Set(hashed_password),
            first_name: Set(first_name),
            last_name: Set(last_name),
            role: Set(role),
            university_id: Set(university_id),
            is_verified: Set(is_verified),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = user_model.insert(db).await?;
        Ok(result)
    }

    pub async fn find_all_with_pagination(
        &self,
        page: u64,
        page_size: u64,
        role_filter: Option<RoleEnum>,
    ) -> Result<(Vec<user::Model>, u64)> {
        let db = self.get_connection();
        let mut query = user::Entity::find();

        if let Some(role) = role_filter {
            query = query.filter(user::Column::Role.eq(role));
        }

        let total = query.clone().count(db).await?;

        let offset = (page - 1) * page_size;
        let users = query
            .order_by_desc(user::Column::CreatedAt)
            .limit(page_size)
            .offset(offset)
            .all(db)
            .await?;

        Ok((users, total))
    }

    pub async fn update(&self, user_id: Uuid, updates: UserUpdate) -> Result<user::Model> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;
        let db = self.get_connection();

        let mut active_user: user::ActiveModel = user.into();

        if let Some(email) = updates.email {
            active_user.email = Set(email);
        }
        if let Some(password) = updates.password {
            active_user.password = Set(password);
        }
        if let Some(first_name) = updates.first_name {
            active_user.first_name = Set(first_name);
        }
        if let Some(last_name) = updates.last_name {
            active_user.last_name = Set(last_name);
        }
        if let Some(role) = updates.role {
            active_user.role = Set(role);
        }
        if let Some(university_id) = updates.university_id {
            active_user.university_id = Set(university_id);
        }
        if let Some(is_verified) = updates.is_verified {
            active_user.is_verified = Set(is_verified);
        }
        if let Some(is_active) = updates.is_active {
            active_user.is_active = Set(is_active);
        }

        active_user.updated_at = Set(Utc::now().naive_utc());

        let result = active_user.update(db).await?;
        Ok(result)
    }

    /// Users are never hard-deleted, only deactivated
    pub async fn deactivate(&self, user_id: Uuid) -> Result<user::Model> {
        self.update(
            user_id,
            UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn count_all(&self) -> Result<u64> {
        let db = self.get_connection();
        let count = user::Entity::find().count(db).await?;
        Ok(count)
    }

    pub async fn count_by_role(&self, role: RoleEnum) -> Result<u64> {
        let db = self.get_connection();
        let count = user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .count(db)
            .await?;
        Ok(count)
    }
}

#[derive(Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<RoleEnum>,
    /// `Some(None)` clears the affiliation
    pub university_id: Option<Option<Uuid>>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
}
