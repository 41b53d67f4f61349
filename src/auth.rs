//! Signup, login and the session gate.
//!
//! Users live under the `users` key with Argon2id password hashes. The active
//! session is a single `currentUser` record with no expiry.

use crate::errors::AppError;
use crate::models::{LoginRequest, SessionUser, SignupRequest, User};
use crate::state::AppState;
use crate::storage::{self, Store};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct UserDirectory {
    store: Store,
    users: Vec<User>,
    current: Option<SessionUser>,
}

impl UserDirectory {
    pub async fn load(store: Store) -> Self {
        let users = store.read_collection(storage::USERS).await;
        let current = store.read_value(storage::CURRENT_USER).await;
        Self {
            store,
            users,
            current,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub async fn signup(&mut self, request: SignupRequest) -> Result<SessionUser, AppError> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::bad_request("name, email and password are required"));
        }
        if request.password != request.confirm_password {
            return Err(AppError::bad_request("Passwords do not match"));
        }
        if self.users.iter().any(|user| user.email == email) {
            return Err(AppError::conflict("Email already exists"));
        }

        let user = User {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(&request.password)?,
            created_at: Utc::now().to_rfc3339(),
        };
        self.users.push(user.clone());
        if let Err(err) = self.store.write_collection(storage::USERS, &self.users).await {
            self.users.pop();
            return Err(err);
        }
        let session = SessionUser::from(&user);
        if let Err(err) = self.start_session(session.clone()).await {
            self.users.pop();
            if let Err(rollback) = self.store.write_collection(storage::USERS, &self.users).await {
                error!("failed to roll back signup for {}: {rollback}", user.email);
            }
            return Err(err);
        }
        info!("registered user {}", user.email);
        Ok(session)
    }

    pub async fn login(&mut self, request: LoginRequest) -> Result<SessionUser, AppError> {
        let email = request.email.trim();
        let session = self
            .users
            .iter()
            .find(|user| user.email == email && verify_password(&request.password, &user.password_hash))
            .map(SessionUser::from);

        match session {
            Some(session) => {
                self.start_session(session.clone()).await?;
                info!("user {} logged in", session.email);
                Ok(session)
            }
            None => {
                warn!("failed login for {email}");
                Err(AppError::unauthorized("Invalid email or password"))
            }
        }
    }

    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.store.remove(storage::CURRENT_USER).await?;
        if let Some(session) = self.current.take() {
            info!("user {} logged out", session.email);
        }
        Ok(())
    }

    async fn start_session(&mut self, session: SessionUser) -> Result<(), AppError> {
        self.store.write_value(storage::CURRENT_USER, &session).await?;
        self.current = Some(session);
        Ok(())
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(hash_error)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(hash_error)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        error!("stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn hash_error(err: argon2::password_hash::Error) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("failed to hash password: {err}"),
    }
}

/// Lets requests through only while someone is logged in.
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let logged_in = state.users.lock().await.current_user().is_some();
    if logged_in {
        return next.run(request).await;
    }

    if request.uri().path().starts_with("/api/") {
        return AppError::unauthorized("Authentication required").into_response();
    }

    Redirect::to("/login").into_response()
}
