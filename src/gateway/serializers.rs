use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisFailure, AnalysisOutcome, AnalysisRequest};

/// `POST /api/analyze` body. Absent keys decode to `None`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeIn {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl AnalyzeIn {
    pub fn parse(body: &str) -> Result<Self, String> {
        serde_json::from_str(body).map_err(|e| format!("invalid JSON body: {}", e))
    }

    /// Reject absent or blank fields before anything is forwarded.
    pub fn validate(self) -> Result<AnalysisRequest, String> {
        let code = required(self.code, "code")?;
        let language = required(self.language, "language")?;
        Ok(AnalysisRequest { code, language })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(format!("field '{}' must not be empty", field)),
        None => Err(format!("missing field '{}'", field)),
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeOut {
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<AnalysisFailure>,
}

impl From<AnalysisOutcome> for AnalyzeOut {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            Ok(result) => Self {
                analysis: result.text,
                failure: None,
            },
            Err(failure) => Self {
                analysis: failure.to_string(),
                failure: Some(failure),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}
