use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::repo_types::{NewUser, StoreError, User, UserChanges};

/// Access to the user table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;
    /// Exact, case-sensitive match on the stored email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    /// Returns `false` when no row has this id.
    async fn update(&self, id: i32, changes: UserChanges) -> Result<bool, StoreError>;
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id_usuario, nombre, correo, contrasena_hash
            FROM usuarios
            ORDER BY id_usuario
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id_usuario, nombre, correo, contrasena_hash
            FROM usuarios
            WHERE id_usuario = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id_usuario, nombre, correo, contrasena_hash
            FROM usuarios
            WHERE correo = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO usuarios (nombre, correo, contrasena_hash)
            VALUES ($1, $2, $3)
            RETURNING id_usuario, nombre, correo, contrasena_hash
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<bool, StoreError> {
        let result = update_query(id, changes).build().execute(&self.db).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id_usuario = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `UPDATE` touching only the columns present in `changes`.
///
/// Callers must pass at least one change.
fn update_query(id: i32, changes: UserChanges) -> QueryBuilder<'static, Postgres> {
    let UserChanges {
        name,
        email,
        password_hash,
    } = changes;

    let mut query = QueryBuilder::<Postgres>::new("UPDATE usuarios SET ");
    let mut set = query.separated(", ");
    if let Some(name) = name {
        set.push("nombre = ").push_bind_unseparated(name);
    }
    if let Some(email) = email {
        set.push("correo = ").push_bind_unseparated(email);
    }
    if let Some(hash) = password_hash {
        set.push("contrasena_hash = ").push_bind_unseparated(hash);
    }
    query.push(" WHERE id_usuario = ").push_bind(id);
    query
}
