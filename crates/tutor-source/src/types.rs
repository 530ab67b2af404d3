//! Wire types of the question service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tutor_model::QuestionRecord;

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub tag: String,
    #[serde(rename = "deviceid")]
    pub device_id: String,
}

/// Successful reply: question records keyed by level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub public: BTreeMap<String, Vec<QuestionRecord>>,
}

/// Body of a failed reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
