//! HTTP client for the remote inference engine

use std::collections::HashMap;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use callscribe_core::AudioBuffer;
use callscribe_diarization::{
    DiarizationCapability, DiarizationError, DiarizedSegment, RawDiarization,
};
use callscribe_transcription::{QualityChunk, TranscriptionCapability, TranscriptionError};

use crate::error::InferenceError;

const DIARIZE_PATH: &str = "/v1/diarize";
const TRANSCRIBE_PATH: &str = "/v1/transcribe";

/// Client for the remote diarization and transcription engine
pub struct InferenceClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl InferenceClient {
    /// Create a client for the engine at `base_url`
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// POST an audio slice as a WAV multipart part and decode the JSON body
    async fn post_audio<T>(&self, path: &str, audio: &AudioBuffer, form: Form) -> Result<T, InferenceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let wav = audio.to_wav_bytes()?;
        let form = form.part(
            "audio",
            Part::bytes(wav)
                .file_name("audio.wav")
                .mime_str("audio/wav")
                .map_err(|e| InferenceError::RequestFailed(e.to_string()))?,
        );

        debug!("POST {}{} ({}ms of audio)", self.base_url, path, audio.duration_ms());

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(InferenceError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("inference engine error: {} - {}", status, error_text);
            return Err(InferenceError::RequestFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))
    }
}

impl DiarizationCapability for InferenceClient {
    async fn diarize(&self, audio: AudioBuffer) -> Result<RawDiarization, DiarizationError> {
        let response: DiarizeResponse = self
            .post_audio(DIARIZE_PATH, &audio, Form::new())
            .await?;

        Ok(RawDiarization {
            segments: response
                .segments
                .into_iter()
                .map(|s| DiarizedSegment {
                    start_ms: s.start_ms,
                    stop_ms: s.stop_ms,
                    speaker: s.speaker,
                })
                .collect(),
            embeddings: response.embeddings,
        })
    }
}

impl TranscriptionCapability for InferenceClient {
    async fn transcribe(
        &self,
        audio: AudioBuffer,
        prompt: &str,
        temperature: f32,
    ) -> Result<Vec<QualityChunk>, TranscriptionError> {
        let mut form = Form::new().text("temperature", temperature.to_string());
        if !prompt.is_empty() {
            form = form.text("prompt", prompt.to_string());
        }

        let response: TranscribeResponse =
            self.post_audio(TRANSCRIBE_PATH, &audio, form).await?;

        Ok(response.chunks)
    }
}

#[derive(Deserialize)]
struct DiarizeResponse {
    segments: Vec<DiarizeSegment>,
    #[serde(default)]
    embeddings: HashMap<String, Vec<f32>>,
}

#[derive(Deserialize)]
struct DiarizeSegment {
    start_ms: u64,
    stop_ms: u64,
    speaker: String,
}

#[derive(Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    chunks: Vec<QualityChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = InferenceClient::new("http://engine.local/", "key".to_string().into());
        assert_eq!(client.base_url, "http://engine.local");
    }

    #[test]
    fn test_transcribe_response_tolerates_missing_chunks() {
        let response: TranscribeResponse = serde_json::from_str("{}").unwrap();
        assert!(response.chunks.is_empty());
    }

    #[test]
    fn test_diarize_response_decoding() {
        let body = r#"{
            "segments": [{"start_ms": 0, "stop_ms": 1500, "speaker": "S0"}],
            "embeddings": {"S0": [0.1, 0.2]}
        }"#;
        let response: DiarizeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.segments.len(), 1);
        assert_eq!(response.segments[0].speaker, "S0");
        assert_eq!(response.embeddings["S0"], vec![0.1, 0.2]);
    }
}
