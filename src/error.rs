use thiserror::Error;

/// Structured error context for configuration and input failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Argument or setting that caused the error (e.g., "image_base64", "XAI_API_KEY")
    pub field_path: Option<String>,
    /// Additional detail about the failure
    pub details: Option<String>,
    /// Component that raised the error (e.g., "client_builder", "tools")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Error taxonomy of the adapter and its tool surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid model: {model}. Available models: [{}]", .available.join(", "))]
    InvalidModel {
        model: String,
        available: Vec<String>,
    },

    #[error("{}", format_upstream(.status, .message))]
    Upstream { status: Option<u16>, message: String },

    #[error("{message}{}", format_context(.context))]
    Input {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_upstream(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Upstream error: HTTP {}: {}", status, message),
        None => format!("Upstream error: {}", message),
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::input_with_context(msg, ErrorContext::new())
    }

    pub fn input_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Input {
            message: msg.into(),
            context,
        }
    }

    /// Non-2xx answer from the upstream API.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Error::Upstream {
            status: Some(status),
            message: body.into(),
        }
    }

    /// Failure below the HTTP status level (connect, timeout, decode).
    pub fn transport(cause: impl Into<String>) -> Self {
        Error::Upstream {
            status: None,
            message: cause.into(),
        }
    }

    /// Whether the retry policy may attempt the call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }

    /// HTTP status carried by an upstream error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// The `error_type` reported on the tool surface.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Configuration { .. } => "configuration_error",
            Error::InvalidModel { .. } => "invalid_model",
            Error::Upstream { .. } => "api_error",
            Error::Input { .. } => "input_error",
            Error::Io(_) => "file_error",
            Error::Serialization(_) => "unexpected_error",
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Input { context, .. } => Some(context),
            _ => None,
        }
    }
}
