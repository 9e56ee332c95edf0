use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::services::encoding::decode_data_uri;
use crate::services::prompt::Prompt;
use crate::services::report::{ModelError, ReportModel};

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_MODEL: &str = "@cf/llava-hf/llava-1.5-7b-hf";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Client for Cloudflare Workers AI vision models (LLaVA request shape).
pub struct WorkersAiClient {
    http: Client,
    api_base: String,
    account_id: String,
    api_token: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct LlavaRequest {
    image: Vec<u8>,
    prompt: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct LlavaResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<LlavaResult>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Deserialize)]
struct LlavaResult {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl WorkersAiClient {
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            account_id: account_id.into(),
            api_token: api_token.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API root (proxies, gateways, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.api_base.trim_end_matches('/'),
            self.account_id,
            self.model
        )
    }
}

#[async_trait]
impl ReportModel for WorkersAiClient {
    /// LLaVA takes one image beside the text, so the first media part is
    /// decoded and sent as raw bytes.
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let image = match prompt.media().next() {
            Some(uri) => decode_data_uri(uri)?.bytes,
            None => Vec::new(),
        };

        let request_body = LlavaRequest {
            image,
            prompt: prompt.text(),
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model = %self.model, "Workers AI request rejected");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let llava_resp: LlavaResponse = response.json().await?;

        if llava_resp.success == Some(false) {
            let message = llava_resp
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ModelError::Provider(message));
        }

        Ok(llava_resp
            .result
            .and_then(|r| r.description)
            .unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
