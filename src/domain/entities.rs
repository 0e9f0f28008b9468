//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A registered account. Email is the canonical login identifier and is
/// unique at write time; the password hash never leaves this record.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: OffsetDateTime,
}

/// A catalog item. Names are unique; the id is assigned by the store.
///
/// Serialization doubles as the cache snapshot format, so the wire shape
/// and the cached shape are the same by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
}
