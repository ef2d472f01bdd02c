use sqlx::FromRow;

/// User row in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,       // assigned by the store, never changes
    pub name: String,
    pub email: String, // unique across all users
}

/// Column values for an insert or a full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
