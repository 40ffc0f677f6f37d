use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::repo::{PublicUser, Role};

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

/// Request body for creating or fully replacing a movie. All fields are
/// optional at the serde level so the validation layer can collect every
/// violation instead of failing on the first missing field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub duration: Option<i32>,
}

/// A movie payload that passed validation: trimmed, typed, range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMovie {
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub release_date: Date,
    pub duration: i32,
}

/// Bare movie row, used for ownership checks before mutation.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub release_date: Date,
    pub duration: i32,
    pub added_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Flat row shape produced by the creator join.
#[derive(Debug, FromRow)]
pub struct MovieCreatorRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub release_date: Date,
    pub duration: i32,
    pub added_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub creator_username: String,
    pub creator_email: String,
    pub creator_role: Role,
}

/// API representation of a movie: the record plus its creator's public
/// profile, camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieWithCreator {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rating: f64,
    #[serde(with = "calendar_date")]
    pub release_date: Date,
    pub duration: i32,
    pub added_by: PublicUser,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<MovieCreatorRow> for MovieWithCreator {
    fn from(row: MovieCreatorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            rating: row.rating,
            release_date: row.release_date,
            duration: row.duration,
            added_by: PublicUser {
                id: row.added_by,
                username: row.creator_username,
                email: row.creator_email,
                role: row.creator_role,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
