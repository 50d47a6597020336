use crate::error::{Result, StatementError};
use crate::llm::types::*;
use reqwest::Client;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_UPLOAD_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta/files";

/// Thin reqwest client for the Gemini Files and generateContent endpoints.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Build a client from the `GEMINI_API_KEY` environment variable.
    /// A missing or empty key halts startup.
    pub fn from_env() -> Result<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(StatementError::MissingApiKey),
        }
    }

    pub async fn upload_document(&self, path: &Path) -> Result<RemoteDocument> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StatementError::InvalidFileName(path.display().to_string()))?
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let file_bytes = fs::read(path).await?;

        self.upload_bytes(&file_name, &mime_type, file_bytes).await
    }

    /// Upload raw file bytes via the resumable upload protocol, then poll
    /// until Google reports the file as ACTIVE.
    pub async fn upload_bytes(
        &self,
        file_name: &str,
        mime_type: &str,
        file_bytes: Vec<u8>,
    ) -> Result<RemoteDocument> {
        let file_size = file_bytes.len() as u64;
        let start_url = format!("{}?key={}", GEMINI_UPLOAD_URL, self.api_key);
        let metadata = json!({ "file": { "display_name": file_name } });

        let init_res = self
            .client
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", file_size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .header("Content-Type", "application/json")
            .json(&metadata)
            .send()
            .await?;

        let init_status = init_res.status();
        if !init_status.is_success() {
            return Err(StatementError::Api {
                status: init_status.as_u16(),
                body: init_res.text().await?,
            });
        }

        let upload_url = init_res
            .headers()
            .get("x-goog-upload-url")
            .ok_or_else(|| {
                StatementError::MalformedResponse("No upload URL in headers".to_string())
            })?
            .to_str()
            .map_err(|e| StatementError::MalformedResponse(e.to_string()))?
            .to_string();

        let upload_res = self
            .client
            .post(&upload_url)
            .header("Content-Length", file_size.to_string())
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(file_bytes)
            .send()
            .await?;

        let upload_status = upload_res.status();
        if !upload_status.is_success() {
            return Err(StatementError::Api {
                status: upload_status.as_u16(),
                body: upload_res.text().await?,
            });
        }

        let upload_body: serde_json::Value = upload_res.json().await?;
        let file_obj = upload_body.get("file").ok_or_else(|| {
            StatementError::MalformedResponse("Upload response missing 'file'".to_string())
        })?;

        let uri = file_obj
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                StatementError::MalformedResponse("Upload response missing uri".to_string())
            })?
            .to_string();

        let name = file_obj
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                StatementError::MalformedResponse("Upload response missing name".to_string())
            })?
            .to_string();

        let mut state = file_obj
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("PROCESSING")
            .to_string();

        while state != "ACTIVE" {
            let check_url = format!("{}/{}?key={}", self.base_url, name, self.api_key);
            let check_res = self.client.get(&check_url).send().await?;
            let check_json: serde_json::Value = check_res.json().await?;
            let file_obj = check_json.get("file").unwrap_or(&check_json);
            state = file_obj
                .get("state")
                .and_then(|v| v.as_str())
                .unwrap_or("PROCESSING")
                .to_string();

            match state.as_str() {
                "ACTIVE" => break,
                "FAILED" => {
                    return Err(StatementError::MalformedResponse(
                        "Google failed to process the file".to_string(),
                    ))
                }
                _ => sleep(Duration::from_secs(2)).await,
            }
        }

        Ok(RemoteDocument {
            uri,
            name,
            display_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            state,
        })
    }

    pub(crate) async fn generate_content(
        &self,
        model: &str,
        system_prompt: &str,
        messages: Vec<Content>,
        response_schema: Option<serde_json::Value>,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: messages,
            system_instruction: Some(Content::user(system_prompt)),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            },
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(StatementError::Api {
                status: status.as_u16(),
                body: res.text().await?,
            });
        }

        let body: GenerateContentResponse = res.json().await?;

        let part = body
            .candidates
            .ok_or_else(|| {
                StatementError::MalformedResponse("No candidates returned".to_string())
            })?
            .into_iter()
            .next()
            .ok_or_else(|| {
                StatementError::MalformedResponse("Empty candidates list".to_string())
            })?
            .content
            .parts
            .into_iter()
            .next()
            .ok_or_else(|| {
                StatementError::MalformedResponse("No parts in content".to_string())
            })?;

        match part {
            Part::Text { text } => Ok(text),
            _ => Err(StatementError::MalformedResponse(
                "Model returned non-text content".to_string(),
            )),
        }
    }

    /// Delete an uploaded file from the Files API.
    pub async fn delete_document(&self, document: &RemoteDocument) -> Result<()> {
        let url = format!("{}/{}?key={}", self.base_url, document.name, self.api_key);
        let res = self.client.delete(&url).send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(StatementError::Api {
                status: status.as_u16(),
                body: res.text().await?,
            });
        }
        Ok(())
    }
}
