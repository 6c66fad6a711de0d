//! Session provider: registration, sign-in/out and session observers

use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        profile::{NewProfile, SignUpRequest},
        session::SessionClaims,
        Profile, SessionContext, SessionEvent,
    },
    repository::Store,
};

/// Receives sign-in and sign-out notifications
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver: Send + Sync {
    fn on_session_event(&self, event: &SessionEvent);
}

/// Observer that writes session events to the tracing log
pub struct TracingSessionObserver;

impl SessionObserver for TracingSessionObserver {
    fn on_session_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::SignedIn(ctx) => {
                tracing::info!(user_id = %ctx.user_id, username = %ctx.username, "User signed in");
            }
            SessionEvent::SignedOut(ctx) => {
                tracing::info!(user_id = %ctx.user_id, username = %ctx.username, "User signed out");
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    config: AuthConfig,
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    observers: Arc<RwLock<Vec<Arc<dyn SessionObserver>>>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, config: AuthConfig) -> Self {
        Self {
            store,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register an observer for session events
    pub async fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.write().await.push(observer);
    }

    async fn publish(&self, event: SessionEvent) {
        for observer in self.observers.read().await.iter() {
            observer.on_session_event(&event);
        }
    }

    /// Register a new user and create their profile
    pub async fn sign_up(&self, request: &SignUpRequest) -> AppResult<Profile> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.store.profile_get_credentials(&email).await?.is_some() {
            return Err(AppError::Conflict(format!("Email {} is already registered", email)));
        }

        let password_hash = self.hash_password(&request.password)?;
        let profile = self
            .store
            .profile_create(&NewProfile {
                id: Uuid::new_v4(),
                email,
                username: request.username.trim().to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %profile.id, "Profile created");
        Ok(profile)
    }

    /// Check credentials, open a session and return its bearer token
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<(String, SessionContext)> {
        let credentials = self
            .store
            .profile_get_credentials(email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&credentials.password_hash, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: credentials.profile.id,
            username: credentials.profile.username.clone(),
            sid: Uuid::new_v4(),
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        let ctx = claims.context();
        self.sessions.write().await.insert(ctx.session_id, ctx.clone());
        self.publish(SessionEvent::SignedIn(ctx.clone())).await;

        Ok((token, ctx))
    }

    /// Close the session; its token is rejected from now on
    pub async fn sign_out(&self, ctx: &SessionContext) -> AppResult<()> {
        let removed = self.sessions.write().await.remove(&ctx.session_id);
        match removed {
            Some(ctx) => {
                self.publish(SessionEvent::SignedOut(ctx)).await;
                Ok(())
            }
            None => Err(AppError::Authentication("Session is not active".to_string())),
        }
    }

    /// Resolve a bearer token to the session it belongs to
    pub async fn authenticate(&self, token: &str) -> AppResult<SessionContext> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        self.sessions
            .read()
            .await
            .get(&claims.sid)
            .cloned()
            .ok_or_else(|| AppError::Authentication("Session expired or signed out".to_string()))
    }

    /// Profile of the acting user
    pub async fn current_user(&self, ctx: &SessionContext) -> AppResult<Profile> {
        self.store.profile_get(ctx.user_id).await
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, hash: &str, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
