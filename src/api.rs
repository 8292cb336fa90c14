// API client module: a small blocking HTTP client for the image generation
// endpoint. One call, one round trip: no retries, no streaming.

use crate::models::{Credential, GenerationOutcome, GenerationRequest, JsonArtifact, OutputFormat};
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Client for the generate endpoint. Images are written into
/// `output_dir` and left there for the caller.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
    output_dir: PathBuf,
}

impl ImageClient {
    pub fn new(endpoint: impl Into<String>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        // Generation can run well past reqwest's default 30 s; wait for the
        // server instead.
        let client = Client::builder()
            .timeout(None)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ImageClient {
            client,
            endpoint: endpoint.into(),
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn headers(credential: &Credential, format: OutputFormat) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&credential.bearer())
            .context("API key contains characters not allowed in a header")?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(format.accept()));
        Ok(headers)
    }

    fn form(req: &GenerationRequest) -> multipart::Form {
        // The empty file part makes the body multipart even though every
        // real field is plain text.
        let placeholder = multipart::Part::bytes(Vec::new()).file_name("none");
        req.fields()
            .into_iter()
            .fold(multipart::Form::new().part("none", placeholder), |form, (name, value)| {
                form.text(name, value)
            })
    }

    /// Submit `req` and map the response. A non-200 status becomes
    /// `GenerationOutcome::Failure`; only transport and file errors are
    /// returned as `Err`.
    pub fn generate(
        &self,
        credential: &Credential,
        req: &GenerationRequest,
    ) -> Result<GenerationOutcome> {
        tracing::info!(
            endpoint = %self.endpoint,
            model = %req.model,
            aspect_ratio = %req.aspect_ratio,
            output_format = %req.output_format,
            "sending generation request"
        );

        let res = self
            .client
            .post(&self.endpoint)
            .headers(Self::headers(credential, req.output_format)?)
            .multipart(Self::form(req))
            .send()
            .context("Failed to send generation request")?;

        let status = res.status();
        tracing::debug!(%status, "generation response received");

        if status != StatusCode::OK {
            let text = res.text().context("Failed to read error response")?;
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            tracing::warn!(%status, "generation request rejected");
            return Ok(GenerationOutcome::Failure {
                status: status.as_u16(),
                body,
            });
        }

        match req.output_format.extension() {
            None => {
                let value: Value = res.json().context("Parsing generation response json")?;
                Ok(GenerationOutcome::Json(value))
            }
            Some(ext) => {
                let bytes = res.bytes().context("Failed to read image bytes")?;
                let path = self.write_output(&bytes, ext)?;
                Ok(GenerationOutcome::Image(path))
            }
        }
    }

    /// Decode the base64 image inside a json-mode result and write it next
    /// to regular image output. `Ok(None)` when the value carries no image.
    pub fn save_embedded_image(&self, value: &Value) -> Result<Option<PathBuf>> {
        let Some(bytes) = decode_embedded_image(value)? else {
            return Ok(None);
        };
        let path = self.write_output(&bytes, sniff_extension(&bytes))?;
        Ok(Some(path))
    }

    fn write_output(&self, bytes: &[u8], ext: &str) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("superduck3-{}.{}", Uuid::new_v4(), ext));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "image written");
        Ok(path)
    }
}

/// Pull the image out of a json-mode response body.
pub fn decode_embedded_image(value: &Value) -> Result<Option<Vec<u8>>> {
    let Ok(artifact) = serde_json::from_value::<JsonArtifact>(value.clone()) else {
        return Ok(None);
    };
    let bytes = general_purpose::STANDARD
        .decode(artifact.image.as_bytes())
        .context("Embedded image is not valid base64")?;
    Ok(Some(bytes))
}

/// Guess a file extension from magic bytes; png unless it looks like jpeg.
fn sniff_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "jpeg"
    } else {
        "png"
    }
}
