//! Request and response bodies as the backend spells them.

use serde::{Deserialize, Serialize};

use crate::entity::{Prompt, PromptId};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Auth endpoints return more (the user record); only the token matters.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub jwt: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PromptFields<'a> {
    pub name: &'a str,
    pub prompt: &'a str,
}

/// `{ "data": ... }` wrapper used for both requests and responses.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PromptRecord {
    pub id: PromptId,
    pub attributes: PromptAttributes,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PromptAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl From<PromptRecord> for Prompt {
    fn from(record: PromptRecord) -> Self {
        Prompt {
            id: record.id,
            name: record.attributes.name.unwrap_or_default(),
            text: record.attributes.prompt.unwrap_or_default(),
        }
    }
}
