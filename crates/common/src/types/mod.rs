use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform response envelope. Clients branch on `success` only; `data` is
/// present on success, `error` (plus optional `details`) on failure.
#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, details: None, message: None }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            message: Some(message.into()),
        }
    }

    /// Success with no payload, message only.
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self { success: true, data: None, error: None, details: None, message: Some(message.into()) }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()), details: None, message: None }
    }

    pub fn err_with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details: Some(details),
            message: None,
        }
    }
}
