use serde::{Deserialize, Serialize};

/// Автор обращения, как его вкладывает бэкенд.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportRequest {
    pub id: i64,
    #[serde(default)]
    pub user: Option<SupportUser>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl SupportRequest {
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.full_name.as_deref())
            .unwrap_or("-")
    }

    pub fn author_email(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .unwrap_or("-")
    }
}
