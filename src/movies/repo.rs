use sqlx::PgPool;
use uuid::Uuid;

use crate::error::FieldError;
use crate::movies::dto::{Movie, MovieCreatorRow, MovieWithCreator, ValidMovie};

const SELECT_WITH_CREATOR: &str = r#"
    SELECT m.id, m.name, m.description, m.rating, m.release_date, m.duration,
           m.added_by, m.created_at, m.updated_at,
           u.username AS creator_username,
           u.email AS creator_email,
           u.role AS creator_role
    FROM movies m
    JOIN users u ON u.id = m.added_by
"#;

const FTS_MATCH: &str =
    "to_tsvector('english', m.name || ' ' || m.description) @@ plainto_tsquery('english', $1)";

/// Sortable movie fields, whitelisted so the API-facing name can be
/// interpolated into ORDER BY safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Rating,
    ReleaseDate,
    Duration,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        match raw {
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "releaseDate" => Ok(Self::ReleaseDate),
            "duration" => Ok(Self::Duration),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            other => Err(FieldError::new(
                "sortBy",
                &format!("Cannot sort by '{other}'"),
            )),
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::ReleaseDate => "release_date",
            Self::Duration => "duration",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than "asc" sorts descending, matching the query
    /// contract's default handling.
    pub fn parse(raw: &str) -> Self {
        if raw == "asc" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

pub fn order_by_clause(sort_by: SortField, order: SortOrder) -> String {
    format!("ORDER BY m.{} {}", sort_by.column(), order.sql())
}

/// All movies, newest first, creator profile joined in.
pub async fn list(db: &PgPool) -> sqlx::Result<Vec<MovieWithCreator>> {
    let rows = sqlx::query_as::<_, MovieCreatorRow>(
        &format!("{SELECT_WITH_CREATOR} ORDER BY m.created_at DESC"),
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Single-field sort; ties fall back to the store's natural order.
pub async fn list_sorted(
    db: &PgPool,
    sort_by: SortField,
    order: SortOrder,
) -> sqlx::Result<Vec<MovieWithCreator>> {
    let sql = format!("{SELECT_WITH_CREATOR} {}", order_by_clause(sort_by, order));
    let rows = sqlx::query_as::<_, MovieCreatorRow>(&sql)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Full-text match over name + description, most relevant first. A query
/// matching nothing yields an empty list, not an error.
pub async fn search(db: &PgPool, query: &str) -> sqlx::Result<Vec<MovieWithCreator>> {
    let sql = format!(
        "{SELECT_WITH_CREATOR} WHERE {FTS_MATCH} \
         ORDER BY ts_rank(to_tsvector('english', m.name || ' ' || m.description), \
                          plainto_tsquery('english', $1)) DESC"
    );
    let rows = sqlx::query_as::<_, MovieCreatorRow>(&sql)
        .bind(query)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<MovieWithCreator>> {
    let row = sqlx::query_as::<_, MovieCreatorRow>(&format!(
        "{SELECT_WITH_CREATOR} WHERE m.id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Into::into))
}

/// Bare row without the join, for ownership checks.
pub async fn find_bare(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Movie>> {
    sqlx::query_as::<_, Movie>(
        r#"
        SELECT id, name, description, rating, release_date, duration,
               added_by, created_at, updated_at
        FROM movies
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Inserts the movie with `added_by` fixed to the creator; the ownership
/// reference is set once here and never reassigned.
pub async fn insert(db: &PgPool, movie: &ValidMovie, added_by: Uuid) -> sqlx::Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO movies (name, description, rating, release_date, duration, added_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&movie.name)
    .bind(&movie.description)
    .bind(movie.rating)
    .bind(movie.release_date)
    .bind(movie.duration)
    .bind(added_by)
    .fetch_one(db)
    .await
}

/// Full-field replacement; `added_by` is deliberately not touched.
pub async fn update(db: &PgPool, id: Uuid, movie: &ValidMovie) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE movies
        SET name = $1, description = $2, rating = $3, release_date = $4,
            duration = $5, updated_at = now()
        WHERE id = $6
        RETURNING id
        "#,
    )
    .bind(&movie.name)
    .bind(&movie.description)
    .bind(movie.rating)
    .bind(movie.release_date)
    .bind(movie.duration)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>("DELETE FROM movies WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(db)
        .await
}
