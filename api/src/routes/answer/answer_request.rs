use serde::{Deserialize, Serialize};

/// Request payload for the answer endpoints.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Visitor question; may be empty.
    pub question: String,
}

/// Response payload for the answer endpoints, on success and on generation
/// failure alike.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub text: String,
}
