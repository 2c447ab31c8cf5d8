use crate::checker::apply;
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to the checking service. Every variant degrades to an
/// empty match list at the call site; none of them abort the run.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("grammar server unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("grammar server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid response from grammar server: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

/// One issue reported by the server. Offsets and lengths count characters
/// and are relative to the exact text that was sent for checking.
#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    pub context: MatchContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Replacement {
    pub value: String,
}

/// Window of text around the issue, with the issue's position inside it.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchContext {
    pub text: String,
    pub offset: usize,
    pub length: usize,
}

impl Match {
    /// The offending span, extracted from the context window.
    pub fn error_text(&self) -> &str {
        apply::byte_span(&self.context.text, self.context.offset, self.context.length)
            .map(|range| &self.context.text[range])
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(rename = "longCode")]
    pub long_code: String,
}

/// Blocking client for a LanguageTool-compatible HTTP server.
pub struct LanguageToolClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl LanguageToolClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send `text` for checking and return the reported matches.
    ///
    /// Empty or whitespace-only text returns no matches without touching
    /// the network.
    pub fn check(
        &self,
        text: &str,
        language: &str,
        disabled_rules: &[String],
    ) -> Result<Vec<Match>, ClientError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("text", text),
            ("language", language),
            ("disabledRules", &disabled_rules.join(",")),
        ];

        let response = self
            .http
            .post(format!("{}/v2/check", self.base_url))
            .form(&params)
            .send()
            .map_err(ClientError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body = response.text().map_err(ClientError::Unreachable)?;
        parse_check_response(&body)
    }

    /// Languages the server can check (`GET /v2/languages`).
    pub fn languages(&self) -> Result<Vec<Language>, ClientError> {
        let response = self
            .http
            .get(format!("{}/v2/languages", self.base_url))
            .send()
            .map_err(ClientError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body = response.text().map_err(ClientError::Unreachable)?;
        serde_json::from_str(&body).map_err(ClientError::MalformedResponse)
    }

    /// Whether the server answers at all; used while waiting for startup.
    pub fn is_ready(&self) -> bool {
        self.languages().is_ok()
    }
}

fn parse_check_response(body: &str) -> Result<Vec<Match>, ClientError> {
    let response: CheckResponse =
        serde_json::from_str(body).map_err(ClientError::MalformedResponse)?;
    Ok(response.matches)
}
