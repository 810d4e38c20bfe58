use axum::Json;
use serde::Serialize;

/// Body shape shared by every endpoint: a success flag, a human
/// readable message and an optional payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.into(),
            data: None,
        })
    }

    /// A designed non-error, e.g. registering an email that is already
    /// on the roster. The request is well-formed, the answer is no.
    pub fn soft(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: false,
            message: message.into(),
            data: None,
        })
    }
}
