use crate::error::{Result, StatementError};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::EXTRACTION_PROMPT;
use crate::llm::types::Content;
use crate::schema::{ExtractedReport, ExtractionResponse};
use crc::{Crc, CRC_64_ECMA_182};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

const CONTENT_DIGEST: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

/// Extracts financial statements from uploaded PDFs.
///
/// One upload and one generation call per document; the remote file is
/// deleted best-effort afterwards. Responses are memoized per client,
/// keyed by a CRC-64 digest of the file content, so re-submitting the same
/// bytes does not hit the API again. Failures are per-file: callers
/// processing a batch report the error and move on.
pub struct StatementExtractor {
    client: GeminiClient,
    model: String,
    prompt: String,
    cache: Mutex<HashMap<u64, ExtractionResponse>>,
}

impl StatementExtractor {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            prompt: EXTRACTION_PROMPT.to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub async fn extract_path(&self, path: &Path) -> Result<Vec<ExtractedReport>> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StatementError::InvalidFileName(path.display().to_string()))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        self.extract_bytes(&file_name, bytes).await
    }

    pub async fn extract_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Vec<ExtractedReport>> {
        let digest = CONTENT_DIGEST.checksum(&bytes);

        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&digest) {
                debug!("Extraction cache hit for '{}'", file_name);
                return Ok(cached.clone().into_reports(file_name));
            }
        }

        let mime_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();
        let document = self.client.upload_bytes(file_name, &mime_type, bytes).await?;

        let messages = vec![Content::user_with_document(
            "Extrae los datos financieros del documento adjunto.",
            &document,
        )];
        let outcome = self
            .client
            .generate_content(&self.model, &self.prompt, messages, response_schema())
            .await;

        // The prototypes always removed the uploaded file; keep that
        // best-effort so a delete failure never masks the extraction result.
        if let Err(e) = self.client.delete_document(&document).await {
            warn!("Could not delete remote file '{}': {}", document.name, e);
        }

        let raw = outcome?;
        let json = extract_json_object(&raw).ok_or_else(|| {
            StatementError::MalformedResponse("no JSON object found in model output".to_string())
        })?;
        let response: ExtractionResponse = serde_json::from_str(json).map_err(|e| {
            StatementError::MalformedResponse(format!(
                "JSON does not match the extraction contract: {}",
                e
            ))
        })?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(digest, response.clone());
        }

        Ok(response.into_reports(file_name))
    }
}

fn response_schema() -> Option<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(ExtractionResponse)).ok()
}

/// Recover the embedded JSON object from free-form model output (models
/// occasionally wrap the JSON in prose or a code fence).
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
