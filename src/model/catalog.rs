//! Categories, users and roles: the plain CRUD records around the board.

use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub nombre: String,
    #[serde(default = "enabled")]
    pub enable: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Role {
    pub id: serde_json::Value,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub usuario: String,
    pub nombre: String,
    pub apellido_paterno: String,
    #[serde(default)]
    pub apellido_materno: Option<String>,
    #[serde(default = "enabled")]
    pub enable: bool,
    #[serde(default)]
    pub rol: Option<Role>,
}

/// Body of `PUT /usuarios/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserUpdate {
    pub usuario: String,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub rol_id: String,
}

/// Query filters of `GET /usuarios`; blank fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub usuario: Option<String>,
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub rol_id: Option<String>,
}

impl UserFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("usuario", &self.usuario),
            ("nombre", &self.nombre),
            ("apellido_paterno", &self.apellido_paterno),
            ("apellido_materno", &self.apellido_materno),
            ("rol_id", &self.rol_id),
        ]
        .iter()
        .filter_map(|(name, value)| match value {
            Some(value) if !value.trim().is_empty() => Some((*name, value.clone())),
            _ => None,
        })
        .collect()
    }
}

/// Acknowledgement body of create/update/disable calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OperationReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CategoryReply {
    pub categoria: Category,
}

fn enabled() -> bool {
    true
}
