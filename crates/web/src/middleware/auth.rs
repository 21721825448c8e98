use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use base64::{Engine, prelude::BASE64_STANDARD};
use storage::error::StorageError;
use storage::models::User;
use storage::services::credentials::verify_password;
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

/// Compares a presented password with the credential stored for a user.
#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn verify(&self, presented: &str, stored: &str) -> bool;
}

/// Verifies against the argon2 hashes written at user creation.
pub struct Argon2CredentialService;

#[async_trait]
impl CredentialService for Argon2CredentialService {
    async fn verify(&self, presented: &str, stored: &str) -> bool {
        let presented = presented.to_string();
        let stored = stored.to_string();

        tokio::task::spawn_blocking(move || verify_password(&presented, &stored))
            .await
            .unwrap_or(false)
    }
}

/// Player resolved from the request's Basic credentials.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedPlayer(pub Uuid);

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let (username, password) = basic_credentials(request.headers())?;
    let user = authenticate(&state, &username, &password).await?;

    request
        .extensions_mut()
        .insert(AuthenticatedPlayer(user.user_id));

    Ok(next.run(request).await)
}

/// Username and password of the request's Basic `Authorization` header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), WebError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic)
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed credentials");
            WebError::Unauthorized
        })
}

/// Resolves a user from a username and password.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<User, WebError> {
    let user = match state.store.find_user_by_username(username).await {
        Ok(user) => user,
        Err(StorageError::NotFound) => {
            tracing::warn!(%username, "Unknown user");
            return Err(WebError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    if !state.credentials.verify(password, &user.password).await {
        tracing::warn!(%username, "Invalid password");
        return Err(WebError::Unauthorized);
    }

    Ok(user)
}

/// Encodes the value that follows `Basic ` in an `Authorization` header.
pub fn basic_token(username: &str, password: &str) -> String {
    BASE64_STANDARD.encode(format!("{}:{}", username, password))
}

fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let header = format!("Basic {}", BASE64_STANDARD.encode("alice:s3cret:pw"));
        assert_eq!(
            parse_basic(&header),
            Some(("alice".to_string(), "s3cret:pw".to_string()))
        );
    }

    #[test]
    fn test_basic_token_parses_back() {
        let header = format!("Basic {}", basic_token("alice", "password123"));
        assert_eq!(
            parse_basic(&header),
            Some(("alice".to_string(), "password123".to_string()))
        );
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic not-base64!"), None);

        let header = format!("Basic {}", BASE64_STANDARD.encode("no-separator"));
        assert_eq!(parse_basic(&header), None);
    }
}
