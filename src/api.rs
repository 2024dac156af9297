//! api.rs
//!
//! Этот модуль реализует тонкую обёртку над HTTP-клиентом для общения с REST бэкендом.
//!
//! Ключевые компоненты:
//! 1.  **ApiClient**: единственный `reqwest::Client` с базовым URL и слотом для
//!     bearer-токена. Токен устанавливается при логине и снимается при логауте.
//! 2.  **ApiError**: таксономия ошибок клиента - транспортная ошибка, отказ бэкенда
//!     (4xx/5xx с сообщением из тела), ошибка декодирования ответа.
//!
//! Повторов и backoff здесь нет намеренно: каждый запрос соответствует одному
//! действию пользователя и либо выполняется, либо возвращает ошибку этому действию.

use std::sync::{Arc, RwLock};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::{debug, error};

use crate::config::ApiConfig;

/// Ошибки при обращении к бэкенду.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Backend { status: 404, .. })
    }
}

// Тело ошибки бэкенда: { "message": "..." }
#[derive(Debug, Deserialize)]
struct BackendMessage {
    message: Option<String>,
}

/// Клиент REST API с базовым URL и bearer-токеном.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Создает и конфигурирует клиент на основе настроек приложения.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Устанавливает или сбрасывает bearer-токен для последующих запросов.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, &url);
        // Заголовок ставим только когда токен есть (как interceptor в исходнике)
        match self.token.read().expect("token lock poisoned").as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // Проверяет статус ответа; для 4xx/5xx достаёт message из тела.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<BackendMessage>()
            .await
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| default_status_message(status));
        error!("backend error {}: {}", status.as_u16(), message);
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = Self::check(builder.send().await?).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn execute_unit(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        Self::execute(self.request(Method::GET, path)).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {} (with query)", path);
        Self::execute(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("POST {}", path);
        Self::execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!("POST {}", path);
        Self::execute_unit(self.request(Method::POST, path).json(body)).await
    }

    /// POST без тела (операции вида mark-used/refund).
    pub async fn post_empty_unit(&self, path: &str) -> Result<(), ApiError> {
        debug!("POST {}", path);
        Self::execute_unit(self.request(Method::POST, path)).await
    }

    /// POST без тела, но с query-параметрами (генерация рейсов).
    pub async fn post_query_unit<Q>(&self, path: &str, query: &Q) -> Result<(), ApiError>
    where
        Q: Serialize + ?Sized,
    {
        debug!("POST {} (with query)", path);
        Self::execute_unit(self.request(Method::POST, path).query(query)).await
    }

    pub async fn put_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!("PUT {}", path);
        Self::execute_unit(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!("PATCH {}", path);
        Self::execute_unit(self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        debug!("DELETE {}", path);
        Self::execute_unit(self.request(Method::DELETE, path)).await
    }
}

fn default_status_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
