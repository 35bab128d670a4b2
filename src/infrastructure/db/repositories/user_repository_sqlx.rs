use async_trait::async_trait;
use sqlx::Row;
use sqlx::mysql::MySqlRow;

use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::domain::users::{NewUser, Role, User};
use crate::infrastructure::db::MySqlPool;

const USER_COLUMNS: &str =
    "id, first_name, middle_name, last_name, email, password, role, created_at";

pub struct SqlxUserRepository {
    pub pool: MySqlPool,
}

impl SqlxUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn map_user(r: &MySqlRow) -> anyhow::Result<User> {
    let role: String = r.try_get("role")?;
    Ok(User {
        id: r.try_get("id")?,
        first_name: r.try_get("first_name")?,
        middle_name: r.try_get("middle_name")?,
        last_name: r.try_get("last_name")?,
        email: r.try_get("email")?,
        password_hash: r.try_get("password")?,
        role: role.parse::<Role>()?,
        created_at: r.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(map_user).collect()
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError> {
        let res = sqlx::query(
            r#"INSERT INTO users (first_name, middle_name, last_name, email, password, role)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.first_name)
        .bind(&user.middle_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CreateUserError::EmailTaken,
            other => CreateUserError::Storage(other.into()),
        })?;

        let id = i32::try_from(res.last_insert_id())
            .map_err(|e| CreateUserError::Storage(anyhow::anyhow!("user id out of range: {}", e)))?;
        self.find_by_id(id)
            .await
            .map_err(CreateUserError::Storage)?
            .ok_or_else(|| {
                CreateUserError::Storage(anyhow::anyhow!("user {} vanished after insert", id))
            })
    }
}
