use crate::auth::password::hash_password;
use crate::db::{models::User, users};
use crate::error::{AppError, AppResult};
use crate::forms::FormErrors;
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const DUPLICATE_EMAIL: &str = "A user with that email address already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegistrationForm {
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password1: String,

    #[serde(default)]
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,
}

/// Cleaned registration data, ready to be saved
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn validate(pool: &SqlitePool, form: &RegistrationForm) -> AppResult<NewAccount> {
    let form = RegistrationForm {
        username: form.username.trim().to_string(),
        email: normalize_email(&form.email),
        ..form.clone()
    };

    let mut errors = FormErrors::default();
    errors.require("username", &form.username);
    errors.require("email", &form.email);
    errors.require("password1", &form.password1);
    errors.require("password2", &form.password2);

    if !errors.has("username") && !is_valid_username(&form.username) {
        errors.add("username", INVALID_USERNAME);
    }
    if let Err(field_errors) = Validate::validate(&form) {
        errors.merge(field_errors);
    }

    if !errors.has("username") && users::find_by_username(pool, &form.username).await?.is_some() {
        errors.add("username", DUPLICATE_USERNAME);
    }
    if !errors.has("email") && users::find_by_email(pool, &form.email).await?.is_some() {
        errors.add("email", DUPLICATE_EMAIL);
    }

    errors.check()?;

    Ok(NewAccount {
        username: form.username,
        email: form.email,
        password: form.password1,
    })
}

/// Create the account
///
/// A concurrent registration that wins the unique constraint is reported as
/// a duplicate username rather than a database failure.
pub async fn save(pool: &SqlitePool, account: &NewAccount) -> AppResult<User> {
    let hash = hash_password(&account.password)?;

    users::create_user(pool, &account.username, &account.email, &hash)
        .await
        .map_err(|e| match e {
            AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let field = if db_err.message().contains("email") {
                    ("email", DUPLICATE_EMAIL)
                } else {
                    ("username", DUPLICATE_USERNAME)
                };
                let mut errors = FormErrors::default();
                errors.add(field.0, field.1);
                AppError::Validation(errors)
            }
            other => other,
        })
}

/// Letters, digits and `@ . + - _`
fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Trim and lowercase the domain part
fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::forms::REQUIRED;

    fn form(username: &str, email: &str, password1: &str, password2: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            email: email.to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    fn errors(result: AppResult<NewAccount>) -> FormErrors {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn username_characters() {
        assert!(is_valid_username("alice.b+c-d_e@x"));
        assert!(is_valid_username("jürgen"));
        assert!(!is_valid_username("alice smith"));
        assert!(!is_valid_username("alice!"));
    }

    #[test]
    fn email_domain_is_lowercased() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "Alice@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[tokio::test]
    async fn blank_form_reports_every_field() {
        let pool = db::connect_in_memory().await.unwrap();
        let errors = errors(validate(&pool, &RegistrationForm::default()).await);
        for field in ["username", "email", "password1", "password2"] {
            assert_eq!(errors.get(field), Some(&[REQUIRED.to_string()][..]), "{field}");
        }
    }

    #[tokio::test]
    async fn field_constraints() {
        let pool = db::connect_in_memory().await.unwrap();
        let errors = errors(
            validate(&pool, &form("bad name", "not-an-email", "short", "different")).await,
        );
        assert_eq!(errors.get("username"), Some(&[INVALID_USERNAME.to_string()][..]));
        assert_eq!(
            errors.get("email"),
            Some(&["Enter a valid email address.".to_string()][..])
        );
        assert!(errors.has("password1"));
        assert_eq!(errors.get("password2"), Some(&[PASSWORD_MISMATCH.to_string()][..]));
    }

    #[tokio::test]
    async fn duplicates_are_rejected() {
        let pool = db::connect_in_memory().await.unwrap();
        users::create_user(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();

        let errors = errors(
            validate(
                &pool,
                &form("alice", "ALICE@example.com", "long-enough", "long-enough"),
            )
            .await,
        );
        assert_eq!(errors.get("username"), Some(&[DUPLICATE_USERNAME.to_string()][..]));
        assert_eq!(errors.get("email"), Some(&[DUPLICATE_EMAIL.to_string()][..]));
    }

    #[tokio::test]
    async fn valid_form_saves_a_hashed_account() {
        let pool = db::connect_in_memory().await.unwrap();
        let account = validate(
            &pool,
            &form(" bob ", "bob@Example.com", "long-enough", "long-enough"),
        )
        .await
        .unwrap();
        assert_eq!(account.username, "bob");
        assert_eq!(account.email, "bob@example.com");

        let user = save(&pool, &account).await.unwrap();
        assert_ne!(user.password_hash, "long-enough");
        assert_eq!(users::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_race_maps_to_duplicate_username() {
        let pool = db::connect_in_memory().await.unwrap();
        let account = NewAccount {
            username: "carol".into(),
            email: "carol@example.com".into(),
            password: "long-enough".into(),
        };
        save(&pool, &account).await.unwrap();

        let again = NewAccount {
            email: "other@example.com".into(),
            ..account
        };
        match save(&pool, &again).await {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("username"), Some(&[DUPLICATE_USERNAME.to_string()][..]))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
