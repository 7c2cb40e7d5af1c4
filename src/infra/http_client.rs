use crate::app::ports::ControllerPort;
use crate::config::ControllerConfig;
use crate::constants::{INVALID_TOKEN_MARKER, TOKEN_CONTENT_TYPE, TOKEN_PATH};
use crate::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Controller REST client authenticating with OAuth client credentials.
///
/// The bearer token is fetched lazily and refreshed once when the controller
/// rejects it as invalid.
pub struct ControllerClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<String>>,
}

impl ControllerClient {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(path) = &config.certificate {
            let pem = std::fs::read(path).map_err(|e| {
                CheckError::Config(format!(
                    "Failed to read controller certificate '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(None),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn bearer_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(existing) = token.as_ref() {
            return Ok(existing.clone());
        }
        let fresh = self.request_token().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    async fn refresh_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        let fresh = self.request_token().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    async fn request_token(&self) -> Result<String> {
        let body = format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            self.client_id, self.client_secret
        );
        let resp = self
            .client
            .post(self.url_for(TOKEN_PATH))
            .header(CONTENT_TYPE, TOKEN_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CheckError::Auth(format!(
                "token request returned {}",
                status
            )));
        }

        let data: Value = resp.json().await?;
        let token = data["access_token"]
            .as_str()
            .ok_or_else(|| CheckError::Auth("token response has no access_token".into()))?
            .to_string();
        info!("Generated Token: {}...", token_preview(&token));
        Ok(token)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: &str,
    ) -> Result<(StatusCode, String)> {
        let mut request = self
            .client
            .request(method, self.url_for(path))
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }

    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        debug!("{} {}", method, path);
        let token = self.bearer_token().await?;
        let (mut status, mut text) = self.send(method.clone(), path, body, &token).await?;

        if is_expired_token(status, &text) {
            info!("Retry - Generate new Token");
            let token = self.refresh_token().await?;
            (status, text) = self.send(method, path, body, &token).await?;
        }

        if !status.is_success() {
            return Err(CheckError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ControllerPort for ControllerClient {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.execute(Method::GET, path, None).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.execute(Method::POST, path, Some(body)).await
    }
}

fn is_expired_token(status: StatusCode, body: &str) -> bool {
    status == StatusCode::UNAUTHORIZED && body.contains(INVALID_TOKEN_MARKER)
}

fn token_preview(token: &str) -> String {
    token.chars().take(20).collect()
}
