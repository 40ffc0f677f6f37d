//! Pure request validation. Each validator collects every violation into a
//! list of field errors rather than stopping at the first.

use lazy_static::lazy_static;
use regex::Regex;
use time::macros::format_description;
use time::Date;

use crate::auth::dto::{LoginRequest, RegisterRequest};
use crate::error::FieldError;
use crate::movies::dto::{MoviePayload, ValidMovie};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn validate_movie(payload: &MoviePayload) -> Result<ValidMovie, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = payload.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    // Length minimums count characters, not bytes, so multibyte input is
    // measured the same way the API contract states it.
    let description = payload.description.trim();
    if description.chars().count() < 10 {
        errors.push(FieldError::new(
            "description",
            "Description must be at least 10 characters",
        ));
    }

    let rating = payload.rating;
    if !rating.is_some_and(|r| (0.0..=10.0).contains(&r)) {
        errors.push(FieldError::new("rating", "Rating must be between 0 and 10"));
    }

    let date_format = format_description!("[year]-[month]-[day]");
    let release_date = payload
        .release_date
        .as_deref()
        .and_then(|raw| Date::parse(raw, &date_format).ok());
    if release_date.is_none() {
        errors.push(FieldError::new(
            "releaseDate",
            "Valid release date is required",
        ));
    }

    let duration = payload.duration;
    if !duration.is_some_and(|d| d >= 1) {
        errors.push(FieldError::new(
            "duration",
            "Duration must be at least 1 minute",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidMovie {
        name: name.to_string(),
        description: description.to_string(),
        rating: rating.unwrap_or_default(),
        release_date: release_date.unwrap_or(Date::MIN),
        duration: duration.unwrap_or_default(),
    })
}

pub fn validate_registration(payload: &RegisterRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if payload.username.trim().chars().count() < 3 {
        errors.push(FieldError::new(
            "username",
            "Username must be at least 3 characters",
        ));
    }
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if payload.password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_login(payload: &LoginRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if payload.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn good_movie() -> MoviePayload {
        MoviePayload {
            name: "The Mirror".into(),
            description: "Fragments of a dying poet's memories.".into(),
            rating: Some(8.0),
            release_date: Some("2024-05-01".into()),
            duration: Some(107),
        }
    }

    #[test]
    fn valid_movie_passes_and_is_trimmed() {
        let mut payload = good_movie();
        payload.name = "  The Mirror  ".into();
        let valid = validate_movie(&payload).expect("should validate");
        assert_eq!(valid.name, "The Mirror");
        assert_eq!(valid.release_date, date!(2024 - 05 - 01));
        assert_eq!(valid.duration, 107);
    }

    #[test]
    fn each_single_violation_names_its_field() {
        let cases: Vec<(MoviePayload, &str)> = vec![
            (
                MoviePayload {
                    name: "   ".into(),
                    ..good_movie()
                },
                "name",
            ),
            (
                MoviePayload {
                    description: "too short".into(),
                    ..good_movie()
                },
                "description",
            ),
            (
                MoviePayload {
                    rating: Some(10.5),
                    ..good_movie()
                },
                "rating",
            ),
            (
                MoviePayload {
                    rating: Some(-0.1),
                    ..good_movie()
                },
                "rating",
            ),
            (
                MoviePayload {
                    release_date: Some("not-a-date".into()),
                    ..good_movie()
                },
                "releaseDate",
            ),
            (
                MoviePayload {
                    release_date: None,
                    ..good_movie()
                },
                "releaseDate",
            ),
            (
                MoviePayload {
                    duration: Some(0),
                    ..good_movie()
                },
                "duration",
            ),
        ];
        for (payload, field) in cases {
            let errors = validate_movie(&payload).expect_err("should fail");
            assert_eq!(errors.len(), 1, "payload failing on {field}");
            assert_eq!(errors[0].field, field);
        }
    }

    #[test]
    fn multiple_violations_are_all_collected() {
        let errors = validate_movie(&MoviePayload::default()).expect_err("should fail");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "description", "rating", "releaseDate", "duration"]
        );
    }

    #[test]
    fn length_minimums_count_characters_not_bytes() {
        // Five accented characters are ten bytes but still too short.
        let payload = MoviePayload {
            description: "ééééé".into(),
            ..good_movie()
        };
        let errors = validate_movie(&payload).expect_err("should fail");
        assert_eq!(errors[0].field, "description");

        // Ten accented characters clear the minimum despite byte length.
        let payload = MoviePayload {
            description: "éééééééééé".into(),
            ..good_movie()
        };
        assert!(validate_movie(&payload).is_ok());

        let payload = RegisterRequest {
            username: "héé".into(),
            email: "h@example.com".into(),
            password: "éééééé".into(),
            role: None,
        };
        assert!(validate_registration(&payload).is_ok());
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in [0.0, 10.0] {
            let payload = MoviePayload {
                rating: Some(rating),
                ..good_movie()
            };
            assert!(validate_movie(&payload).is_ok());
        }
    }

    #[test]
    fn registration_collects_all_violations() {
        let payload = RegisterRequest {
            username: "ab".into(),
            email: "nope".into(),
            password: "12345".into(),
            role: None,
        };
        let errors = validate_registration(&payload).expect_err("should fail");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn registration_accepts_minimal_valid_payload() {
        let payload = RegisterRequest {
            username: "bob".into(),
            email: "bob@example.com".into(),
            password: "secret1".into(),
            role: None,
        };
        assert!(validate_registration(&payload).is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&LoginRequest {
            email: String::new(),
            password: String::new(),
        })
        .expect_err("should fail");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Email is required");
        assert_eq!(errors[1].message, "Password is required");
    }
}
