//! Registration and login.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::application::repos::{NewUserParams, RepoError, UsersRepo};
use crate::application::tokens::{TokenError, TokenService};
use crate::domain::entities::UserRecord;
use crate::domain::validate::{
    BLANK, FieldErrors, INVALID_EMAIL, MIN_PASSWORD_LEN, REQUIRED, email_is_well_formed,
    password_is_strong_enough,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(FieldErrors),
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Raw registration input; fields are optional so absence can be reported
/// per field instead of failing deserialization wholesale.
#[derive(Debug, Clone, Default)]
pub struct RegisterCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginCommand {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepo>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Validate, hash, and persist a new account.
    ///
    /// The password never appears in the returned record's public
    /// projection; duplicate email is reported as a field error so the
    /// registration form can point at the offending input.
    pub async fn register(&self, cmd: RegisterCommand) -> Result<UserRecord, AuthError> {
        let mut errors = FieldErrors::new();

        let username = cmd.username.unwrap_or_default();
        if username.trim().is_empty() {
            errors.push("username", BLANK);
        }

        let email = cmd.email.unwrap_or_default();
        if email.is_empty() {
            errors.push("email", REQUIRED);
        } else if !email_is_well_formed(&email) {
            errors.push("email", INVALID_EMAIL);
        }

        match cmd.password.as_deref() {
            None => errors.push("password", REQUIRED),
            Some(password) if !password_is_strong_enough(password) => errors.push(
                "password",
                format!(
                    "This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."
                ),
            ),
            Some(_) => {}
        }

        errors.into_result().map_err(AuthError::Validation)?;

        let password = cmd.password.unwrap_or_default();
        let password_hash = hash_password(&password)?;

        match self
            .users
            .create_user(NewUserParams {
                email,
                username,
                password_hash,
                created_at: OffsetDateTime::now_utc(),
            })
            .await
        {
            Ok(user) => {
                info!(target: "curio::auth", user_id = user.id, "registered user");
                Ok(user)
            }
            Err(RepoError::Duplicate { .. }) => {
                let mut errors = FieldErrors::new();
                errors.push("email", "A user with this email already exists.");
                Err(AuthError::Validation(errors))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Check credentials and issue an access token.
    pub async fn login(&self, cmd: LoginCommand) -> Result<String, AuthError> {
        let mut errors = FieldErrors::new();

        let email = cmd.email.unwrap_or_default();
        if email.is_empty() {
            errors.push("email", REQUIRED);
        }
        let password = cmd.password.unwrap_or_default();
        if password.is_empty() {
            errors.push("password", REQUIRED);
        }

        errors.into_result().map_err(AuthError::Validation)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let access = self.tokens.issue(user.id)?;
        info!(target: "curio::auth", user_id = user.id, "issued access token");
        Ok(access)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-memory credential store with the same unique-email behavior as
    /// the SQLite adapter.
    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<HashMap<String, UserRecord>>,
    }

    #[async_trait]
    impl UsersRepo for MemoryUsers {
        async fn create_user(&self, params: NewUserParams) -> Result<UserRecord, RepoError> {
            let mut users = self.users.lock().expect("lock");
            if users.contains_key(&params.email) {
                return Err(RepoError::Duplicate {
                    constraint: "users.email".to_string(),
                });
            }
            let record = UserRecord {
                id: users.len() as i64 + 1,
                email: params.email.clone(),
                username: params.username,
                password_hash: params.password_hash,
                is_staff: false,
                is_superuser: false,
                created_at: params.created_at,
            };
            users.insert(params.email, record.clone());
            Ok(record)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
            Ok(self.users.lock().expect("lock").get(email).cloned())
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUsers::default()),
            Arc::new(TokenService::new(
                "auth-test-secret",
                std::time::Duration::from_secs(60),
            )),
        )
    }

    fn valid_registration() -> RegisterCommand {
        RegisterCommand {
            username: Some("testuser".to_string()),
            email: Some("testuser@example.com".to_string()),
            password: Some("testpassword".to_string()),
        }
    }

    #[tokio::test]
    async fn register_persists_and_echoes_identity() {
        let auth = service();
        let user = auth.register(valid_registration()).await.expect("register");
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "testuser@example.com");
        assert_ne!(user.password_hash, "testpassword");
    }

    #[tokio::test]
    async fn register_reports_every_invalid_field_at_once() {
        let auth = service();
        let err = auth
            .register(RegisterCommand {
                username: Some(String::new()),
                email: Some("invalid".to_string()),
                password: Some("11".to_string()),
            })
            .await
            .expect_err("must fail");

        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.contains("username"));
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[tokio::test]
    async fn register_duplicate_email_is_a_field_error() {
        let auth = service();
        auth.register(valid_registration()).await.expect("first");
        let err = auth
            .register(valid_registration())
            .await
            .expect_err("duplicate");

        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.contains("email"));
    }

    #[tokio::test]
    async fn login_round_trips_through_the_token_service() {
        let auth = service();
        let user = auth.register(valid_registration()).await.expect("register");

        let access = auth
            .login(LoginCommand {
                email: Some("testuser@example.com".to_string()),
                password: Some("testpassword".to_string()),
            })
            .await
            .expect("login");

        let tokens = TokenService::new("auth-test-secret", std::time::Duration::from_secs(60));
        assert_eq!(tokens.verify(&access), Ok(user.id));
    }

    #[tokio::test]
    async fn login_does_not_say_which_credential_was_wrong() {
        let auth = service();
        auth.register(valid_registration()).await.expect("register");

        let wrong_password = auth
            .login(LoginCommand {
                email: Some("testuser@example.com".to_string()),
                password: Some("wrongpassword".to_string()),
            })
            .await
            .expect_err("wrong password");
        let unknown_email = auth
            .login(LoginCommand {
                email: Some("nobody@example.com".to_string()),
                password: Some("testpassword".to_string()),
            })
            .await
            .expect_err("unknown email");

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_reports_missing_fields_per_field() {
        let auth = service();
        let err = auth
            .login(LoginCommand {
                email: Some("testuser@example.com".to_string()),
                password: None,
            })
            .await
            .expect_err("missing password");

        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.contains("password"));
        assert!(!errors.contains("email"));
    }
}
