//! Экран пользователей: список только для чтения.

use std::sync::Arc;

use crate::models::{Listing, User};
use crate::screens::ScreenError;
use crate::AppState;

pub struct UsersScreen {
    state: Arc<AppState>,
}

impl UsersScreen {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<User>, ScreenError> {
        let listing: Listing<User> = self.state.api.get("/profile/users").await?;
        Ok(listing.into_vec())
    }
}
