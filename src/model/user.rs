use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_id: u8,
    pub is_active: bool,
}

/// Login projection, includes the argon2 hash.
#[derive(FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: u8,
    pub is_active: bool,
}
