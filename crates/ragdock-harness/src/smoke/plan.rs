//! The data-driven check sequence.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::HarnessError;

/// One request and the fields its response must mention.
#[derive(Debug, Clone)]
pub struct SmokeCheck {
    pub name: String,
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub required_fields: Vec<String>,
}

impl SmokeCheck {
    pub fn new(
        name: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        body: Option<Value>,
        required_fields: &[&str],
    ) -> Result<Self, HarnessError> {
        let name = name.into();
        if required_fields.is_empty() {
            return Err(HarnessError::Config(format!(
                "check '{}' has no required fields",
                name
            )));
        }
        Ok(Self {
            name,
            method,
            path: path.into(),
            body,
            required_fields: required_fields.iter().map(|f| f.to_string()).collect(),
        })
    }
}

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub n_results: u32,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, n_results: u32) -> Result<Self, HarnessError> {
        let request = Self {
            query: query.into(),
            n_results,
        };
        if request.query.chars().count() < 3 {
            return Err(HarnessError::Config(
                "query must be at least 3 characters".to_string(),
            ));
        }
        if !(1..=10).contains(&request.n_results) {
            return Err(HarnessError::Config(format!(
                "n_results must be within 1..=10, got {}",
                request.n_results
            )));
        }
        Ok(request)
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub use_context: bool,
    pub n_context: u32,
}

impl GenerateRequest {
    pub fn new(
        prompt: impl Into<String>,
        use_context: bool,
        n_context: u32,
    ) -> Result<Self, HarnessError> {
        let request = Self {
            prompt: prompt.into(),
            use_context,
            n_context,
        };
        if request.prompt.chars().count() < 10 {
            return Err(HarnessError::Config(
                "prompt must be at least 10 characters".to_string(),
            ));
        }
        if request.n_context > 5 {
            return Err(HarnessError::Config(format!(
                "n_context must be within 0..=5, got {}",
                request.n_context
            )));
        }
        Ok(request)
    }
}

/// Ordered list of checks; each one gates the next.
#[derive(Debug, Clone)]
pub struct SmokePlan {
    checks: Vec<SmokeCheck>,
}

impl SmokePlan {
    pub fn new(checks: Vec<SmokeCheck>) -> Self {
        Self { checks }
    }

    /// seed, then query, then generate.
    pub fn default_plan() -> Result<Self, HarnessError> {
        let query = QueryRequest::new("FastAPI endpoint with pagination and filters", 3)?;
        let generate = GenerateRequest::new(
            "Write a FastAPI POST /items endpoint that validates the payload with Pydantic",
            true,
            2,
        )?;

        Ok(Self::new(vec![
            SmokeCheck::new("seed", Method::POST, "/seed", None, &["seeded", "count"])?,
            SmokeCheck::new(
                "query",
                Method::POST,
                "/query",
                Some(to_body(&query)?),
                &["matches"],
            )?,
            SmokeCheck::new(
                "generate",
                Method::POST,
                "/generate",
                Some(to_body(&generate)?),
                &["model", "code"],
            )?,
        ]))
    }

    pub fn checks(&self) -> &[SmokeCheck] {
        &self.checks
    }
}

fn to_body(request: &impl Serialize) -> Result<Value, HarnessError> {
    serde_json::to_value(request).map_err(|e| HarnessError::Config(format!("request body: {}", e)))
}
