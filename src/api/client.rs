use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::wire::{
    AuthResponse, Envelope, LoginRequest, PromptFields, PromptRecord, RegisterRequest,
};
use crate::entity::{Prompt, PromptId};
use crate::error::{MutationAction, PromptdeskError, Result};

/// Thin client over the backend's auth and prompt endpoints.
///
/// Every call is a single request with no retry and no timeout. Any non-2xx
/// status maps to the error kind of the operation; failures before a status
/// is available surface as `Transport`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /auth/local`; returns the issued bearer token.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String> {
        tracing::debug!(identifier, "POST /auth/local");
        let response = self
            .http
            .post(self.url("/auth/local"))
            .json(&LoginRequest {
                identifier,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PromptdeskError::Auth {
                status: status.as_u16(),
            });
        }

        let auth: AuthResponse = read_json(response).await?;
        Ok(auth.jwt)
    }

    /// `POST /auth/local/register`; returns the issued bearer token.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        tracing::debug!(username, email, "POST /auth/local/register");
        let response = self
            .http
            .post(self.url("/auth/local/register"))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PromptdeskError::Auth {
                status: status.as_u16(),
            });
        }

        let auth: AuthResponse = read_json(response).await?;
        Ok(auth.jwt)
    }

    /// `GET /prompts`, in the order the backend returns them.
    pub async fn list_prompts(&self, token: &str) -> Result<Vec<Prompt>> {
        tracing::debug!("GET /prompts");
        let response = self
            .http
            .get(self.url("/prompts"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PromptdeskError::Fetch {
                status: status.as_u16(),
            });
        }

        let body: Envelope<Vec<PromptRecord>> = read_json(response).await?;
        Ok(body.data.into_iter().map(Prompt::from).collect())
    }

    /// `POST /prompts`; returns the record with its backend-assigned id.
    pub async fn create_prompt(&self, token: &str, name: &str, text: &str) -> Result<Prompt> {
        tracing::debug!(name, "POST /prompts");
        let response = self
            .http
            .post(self.url("/prompts"))
            .bearer_auth(token)
            .json(&Envelope {
                data: PromptFields { name, prompt: text },
            })
            .send()
            .await?;

        read_mutation(response, MutationAction::Create).await
    }

    /// `PUT /prompts/{id}`
    pub async fn update_prompt(
        &self,
        token: &str,
        id: &PromptId,
        name: &str,
        text: &str,
    ) -> Result<Prompt> {
        tracing::debug!(%id, name, "PUT /prompts/{{id}}");
        let response = self
            .http
            .put(self.url(&format!("/prompts/{}", id)))
            .bearer_auth(token)
            .json(&Envelope {
                data: PromptFields { name, prompt: text },
            })
            .send()
            .await?;

        read_mutation(response, MutationAction::Update).await
    }

    /// `DELETE /prompts/{id}`; the response body is ignored.
    pub async fn delete_prompt(&self, token: &str, id: &PromptId) -> Result<()> {
        tracing::debug!(%id, "DELETE /prompts/{{id}}");
        let response = self
            .http
            .delete(self.url(&format!("/prompts/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PromptdeskError::Mutation {
                action: MutationAction::Delete,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn read_mutation(response: Response, action: MutationAction) -> Result<Prompt> {
    let status = response.status();
    if !status.is_success() {
        return Err(PromptdeskError::Mutation {
            action,
            status: status.as_u16(),
        });
    }

    let body: Envelope<PromptRecord> = read_json(response).await?;
    Ok(body.data.into())
}
