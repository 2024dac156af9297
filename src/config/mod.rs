use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub seatmap: SeatmapConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rust_log: String,
}

// Настройки REST API бэкенда
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Учётные данные администратора для входа из CLI
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Настройки редактора схемы мест
#[derive(Debug, Clone)]
pub struct SeatmapConfig {
    pub default_base_price: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "rail_admin=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:9000/api".to_string()),
                timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("API_TIMEOUT_SECONDS must be a valid number"),
            },
            auth: AuthConfig {
                email: env::var("ADMIN_EMAIL").ok(),
                password: env::var("ADMIN_PASSWORD").ok(),
            },
            seatmap: SeatmapConfig {
                default_base_price: env::var("SEAT_DEFAULT_BASE_PRICE")
                    .unwrap_or_else(|_| "300000".to_string())
                    .parse()
                    .expect("SEAT_DEFAULT_BASE_PRICE must be a valid number"),
            },
        }
    }
}
