//! Сессия администратора: явный объект вместо глобального состояния.
//!
//! Жизненный цикл: `login` создаёт сессию и устанавливает токен в `ApiClient`,
//! `logout` снимает и то и другое. `require_role` - аналог route guard:
//! экраны вызывают его перед загрузкой данных.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::models::User;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("role '{required}' required")]
    Forbidden { required: String },
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: TokenPair,
    user: User,
}

pub struct SessionStore {
    api: ApiClient,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            current: RwLock::new(None),
        }
    }

    /// Логин: POST /auth/login, сохраняем пользователя и токен.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let resp: LoginResponse = self
            .api
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        self.api.set_token(Some(resp.token.access_token.clone()));
        info!("logged in as {}", resp.user.email);
        let user = resp.user.clone();
        *self.current.write().expect("session lock poisoned") = Some(Session {
            user: resp.user,
            access_token: resp.token.access_token,
        });
        Ok(user)
    }

    /// Логаут: чистим сессию и токен.
    pub fn logout(&self) {
        self.api.set_token(None);
        *self.current.write().expect("session lock poisoned") = None;
        info!("logged out");
    }

    pub fn current_user(&self) -> Option<User> {
        self.current
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    /// Route guard: пускаем только пользователя с нужной ролью.
    pub fn require_role(&self, role: &str) -> Result<(), AuthError> {
        let guard = self.current.read().expect("session lock poisoned");
        let session = guard.as_ref().ok_or(AuthError::NotLoggedIn)?;
        if session.user.role.as_deref() == Some(role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                required: role.to_string(),
            })
        }
    }
}
