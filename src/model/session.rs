use serde_derive::{Deserialize, Serialize};

/// The signed-in user as far as the board cares: its id scopes task queries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
}

/// Credentials passed explicitly to the fetch client and the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<SessionUser>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.user.is_some()
    }
}
