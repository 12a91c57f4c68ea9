use serde_json::Value;

/// Success text of a completed add.
pub const CREATED: &str = "Created";
/// Success text of a completed update or delete.
pub const OK: &str = "OK";

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Store,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest => 400,
            Self::Store => 502,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::Store => "store",
        }
    }
}

/// Failure of a dispatched request. `Display` is the legacy response text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("NotFound Invalid Request Body")]
    MissingBody,
    #[error("BadRequest Malformed request body: {0}")]
    MalformedBody(String),
    #[error("BadRequest Action cannot be null or Empty")]
    MissingAction,
    #[error("BadRequest Unsupported action: {0}")]
    UnsupportedAction(String),
    #[error("BadRequest Missing '{section}' parameters for action {action}")]
    MissingParameters {
        action: String,
        section: &'static str,
    },
    #[error("{message}")]
    Store {
        code: Option<String>,
        message: String,
    },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingBody => ErrorKind::NotFound,
            Self::MalformedBody(_)
            | Self::MissingAction
            | Self::UnsupportedAction(_)
            | Self::MissingParameters { .. } => ErrorKind::BadRequest,
            Self::Store { .. } => ErrorKind::Store,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Text(String),
    Json(Value),
}

impl OperationOutput {
    /// Response text; JSON is indented.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => format!("{value:#}"),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text(_) => TEXT_CONTENT_TYPE,
            Self::Json(_) => JSON_CONTENT_TYPE,
        }
    }
}

pub type Outcome = Result<OperationOutput, DispatchError>;

/// Collapses an outcome into the single string body older callers expect.
pub fn render_body(outcome: &Outcome) -> String {
    match outcome {
        Ok(output) => output.render(),
        Err(error) => error.to_string(),
    }
}
