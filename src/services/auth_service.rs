//! Authentication service - credential checks and JWT handling.
//!
//! Users sign in with their email or their document number. Tokens carry
//! the user id, email and active role names.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Well-formed Argon2 hash that matches no password. Verified against when
/// the account is missing so both paths cost the same.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a token
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse>;

    /// Active user matching the credentials
    async fn validate_credentials(&self, identifier: &str, password: &str) -> AppResult<User>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// User behind a verified token
    async fn current_user(&self, user_id: i64) -> AppResult<User>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        roles: user.roles.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn find_account(&self, identifier: &str) -> AppResult<Option<User>> {
        let identifier = identifier.trim();
        if identifier.contains('@') {
            self.uow.users().find_by_email(identifier).await
        } else {
            self.uow.users().find_by_document(identifier).await
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse> {
        let user = self.validate_credentials(&identifier, &password).await?;
        tracing::info!(user_id = user.id, "User signed in");
        generate_token(&user, &self.config)
    }

    async fn validate_credentials(&self, identifier: &str, password: &str) -> AppResult<User> {
        let account = self.find_account(identifier).await?;

        let hash = account
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(DUMMY_HASH);
        let password_valid = Password::from_hash(hash).verify(password);

        match account {
            Some(user) if password_valid && user.active => Ok(user),
            _ => {
                tracing::warn!("Rejected sign-in attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn current_user(&self, user_id: i64) -> AppResult<User> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        if !user.active {
            return Err(AppError::Unauthorized);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentType;
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;

    fn account(active: bool, password: &str) -> User {
        let now = Utc::now();
        User {
            id: 7,
            document_type: DocumentType::Cc,
            document_number: "1032456789".to_string(),
            first_names: "María".to_string(),
            last_names: "Rojas".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            password_hash: Password::new(password).unwrap().into_string(),
            active,
            roles: vec!["PROPIETARIO".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::new().with_users(repo).into_arc();
        Authenticator::new(uow, Config::with_secret("test-secret-key-minimum-32-chars!!"))
    }

    #[tokio::test]
    async fn test_login_by_email_issues_token_with_roles() {
        let user = account(true, "SecurePass123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("maria@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(repo);
        let token = auth
            .login("maria@example.com".to_string(), "SecurePass123".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.roles, vec!["PROPIETARIO".to_string()]);
    }

    #[tokio::test]
    async fn test_login_by_document_number() {
        let user = account(true, "SecurePass123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_document()
            .with(eq("1032456789"))
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(repo)
            .login("1032456789".to_string(), "SecurePass123".to_string())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_sign_in() {
        let user = account(false, "SecurePass123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(repo)
            .validate_credentials("maria@example.com", "SecurePass123")
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let user = account(true, "SecurePass123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("maria@example.com"))
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_find_by_email()
            .with(eq("nobody@example.com"))
            .returning(|_| Ok(None));

        let auth = service(repo);
        let wrong = auth.validate_credentials("maria@example.com", "WrongPass123").await;
        let missing = auth.validate_credentials("nobody@example.com", "SecurePass123").await;

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(missing, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let auth = service(MockUserRepository::new());
        assert!(auth.verify_token("not.a.token").is_err());
    }
}
