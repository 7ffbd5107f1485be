use crate::batch::BatchError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "strategy.kind", "request.url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected values, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_loader", "request_preparer")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
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

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for batch dispatch.
///
/// Per-request transport problems never surface here directly: they are captured as
/// outcomes and reported together through [`Error::Batch`]. File reads are reported
/// as [`Error::Configuration`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },

    #[error("Batch error: {0}")]
    Batch(Box<BatchError>),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
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

impl From<BatchError> for Error {
    fn from(err: BatchError) -> Self {
        Error::Batch(Box::new(err))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new runtime error with structured context
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Borrow the aggregate batch failure, if this is one.
    pub fn as_batch(&self) -> Option<&BatchError> {
        match self {
            Error::Batch(err) => Some(err),
            _ => None,
        }
    }

    /// Take ownership of the aggregate batch failure, if this is one.
    pub fn into_batch(self) -> Option<BatchError> {
        match self {
            Error::Batch(err) => Some(*err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_in_display() {
        let err = Error::configuration_with_context(
            "unknown deserializer 'xml'",
            ErrorContext::new()
                .with_field_path("deserializer.kind")
                .with_source("deserializer_selector"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error: unknown deserializer 'xml'"));
        assert!(msg.contains("field: deserializer.kind"));
        assert!(msg.contains("source: deserializer_selector"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_context_renders_nothing() {
        let err = Error::runtime_with_context("boom", ErrorContext::default());
        assert_eq!(err.to_string(), "Runtime error: boom");
        assert!(err.context().is_some());
        assert!(err.as_batch().is_none());
    }

    fn kind(err: &Error) -> &'static str {
        // No wildcard arm: every variant is listed.
        match err {
            Error::Configuration { .. } => "configuration",
            Error::Validation { .. } => "validation",
            Error::Runtime { .. } => "runtime",
            Error::Batch(_) => "batch",
            Error::Serialization(_) => "serialization",
        }
    }

    struct Refusing;

    impl crate::transport::Transport for Refusing {
        fn send(
            &self,
            _request: &crate::request::PreparedRequest,
        ) -> std::result::Result<crate::transport::Response, crate::transport::TransportError>
        {
            Err(crate::transport::TransportError::Other("refused".into()))
        }
    }

    #[test]
    fn test_transport_failure_only_surfaces_as_batch() {
        let requests = vec![crate::request::get("http://localhost/a").prepare().unwrap()];
        let err = crate::batch::Strategy::Sequential
            .execute(requests, &Refusing, &crate::deserializer::Raw)
            .unwrap_err();
        assert_eq!(kind(&err), "batch");
        assert_eq!(err.as_batch().unwrap().failed(), &[0]);

        let err = crate::config::BatchConfig::from_file("/no/such/batch.yaml").unwrap_err();
        assert_eq!(kind(&err), "configuration");
    }
}
