use std::fmt::{Debug, Display};

use reqwest::header::CONTENT_TYPE;

pub struct GeminiClient {
    key: GeminiApiKey,
    http: reqwest::blocking::Client,
}
impl GeminiClient {
    const URL: &'static str = "https://generativelanguage.googleapis.com/v1beta/models";
    const API_KEY_HEADER: &'static str = "x-goog-api-key";
    pub fn new(key: GeminiApiKey) -> Self {
        Self {
            key,
            http: reqwest::blocking::Client::new(),
        }
    }
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GeminiApiKey::from_env()?))
    }
    /// One synchronous generateContent call. Blocks until the api responds
    /// or the transport fails.
    pub fn generate(&self, model: GeminiModel, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(Self::request_url(model))
            .header(CONTENT_TYPE, "application/json")
            .header(Self::API_KEY_HEADER, self.key.key())
            .json(&GenerateRequest::single_turn(prompt))
            .send()
            .map_err(|e| {
                GeminiClientError::new(
                    "Cause Error at GeminiClient::generate".to_string(),
                    GeminiClientErrorKind::RequestError(e.to_string()),
                )
            })?;
        let status = response.status();
        let body = response.text().map_err(|e| {
            GeminiClientError::new(
                "Cause Error at GeminiClient::generate".to_string(),
                GeminiClientErrorKind::ResponseError(e.to_string()),
            )
        })?;
        if !status.is_success() {
            return Err(GeminiClientError::new(
                format!("gemini api returned status {}", status),
                GeminiClientErrorKind::ResponseError(body),
            ));
        }
        let parsed = match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Err(GeminiClientError::new(
                    format!("Failed to parse generate response: {}", e),
                    GeminiClientErrorKind::ResponseDeserializeError(body),
                ))
            }
        };
        parsed.text().ok_or_else(|| {
            GeminiClientError::new(
                "gemini api returned no candidate text".to_string(),
                GeminiClientErrorKind::ParseError(body),
            )
        })
    }
    fn request_url(model: GeminiModel) -> String {
        format!("{}/{}:generateContent", Self::URL, model.as_str())
    }
}

#[derive(Debug, Clone, serde::Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}
impl GenerateRequest {
    // Each call is a single user turn. No history is carried.
    fn single_turn(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.into(),
                }],
            }],
        }
    }
}
#[derive(Debug, Clone, serde::Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}
#[derive(Debug, Clone, serde::Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}
impl GenerateResponse {
    pub(crate) fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
#[derive(Debug, Clone, serde::Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}
// A safety-blocked candidate may come back without content or parts.
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}
#[derive(Debug, Clone, serde::Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiApiKey(String);

impl GeminiApiKey {
    pub fn from_env() -> Result<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self(key)),
            _ => Err(GeminiClientError::new(
                "GEMINI_API_KEY is not found".to_string(),
                GeminiClientErrorKind::NotFoundEnvAPIKey,
            )),
        }
    }
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
    fn key(&self) -> &str {
        self.0.as_str()
    }
}
impl Debug for GeminiApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "x".repeat(self.0.len()))
    }
}
impl Display for GeminiApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "x".repeat(self.0.len()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiModel {
    Gemini25Flash,
    Gemini25Pro,
}
impl Default for GeminiModel {
    fn default() -> Self {
        Self::Gemini25Flash
    }
}
impl GeminiModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini25Pro => "gemini-2.5-pro",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GeminiClientError {
    message: String,
    pub kind: GeminiClientErrorKind,
}
impl GeminiClientError {
    pub fn new(message: String, kind: GeminiClientErrorKind) -> Self {
        Self { message, kind }
    }
}
impl Display for GeminiClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "kind : {}\n message : {}", self.kind, self.message)
    }
}
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GeminiClientErrorKind {
    NotFoundEnvAPIKey,
    RequestError(String),
    ResponseError(String),
    ResponseDeserializeError(String),
    ParseError(String),
}
impl Display for GeminiClientErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::NotFoundEnvAPIKey => "Not found GEMINI_API_KEY in env".to_string(),
            Self::RequestError(s) => format!("Request Error. Error is : {}", s),
            Self::ResponseError(s) => format!("Response Error. Error is : {}", s),
            Self::ResponseDeserializeError(s) => {
                format!("Not Deserialize response. Serde Error is :  {}", s)
            }
            Self::ParseError(s) => format!("Parse Error. Error is : {}", s),
        };
        write!(f, "{}", kind)
    }
}
impl std::error::Error for GeminiClientError {}
pub type Result<T> = std::result::Result<T, GeminiClientError>;
