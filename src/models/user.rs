use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}
