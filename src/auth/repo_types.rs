use time::OffsetDateTime;

/// Registered user, keyed by email in the store.
#[derive(Debug, Clone)]
pub struct User {
    pub name: String,
    pub email: String,              // trimmed, lower-cased
    pub password_hash: String,      // Argon2 PHC string
    pub created_at: OffsetDateTime,
}

/// Fields needed to register a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Login session carried by the `SESSIONID` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub email: String,
}
