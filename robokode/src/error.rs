use thiserror::Error;

use crate::span::Span;

/// What went wrong. Parse-time and run-time faults share one list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unexpected instruction")]
    UnexpectedInstruction,

    #[error("expected {0}")]
    Expected(String),

    #[error("invalid direction")]
    InvalidDirection,

    #[error("malformed expression")]
    MalformedExpression,

    #[error("unclosed block")]
    UnclosedBlock,

    #[error("unknown operator")]
    UnknownOperator,

    // Run-time faults
    #[error("unknown label")]
    UnknownLabel,

    #[error("invalid variable")]
    InvalidVariable,
}

/// One collected error: the message, the offending token text and whether
/// the editor should try to highlight that token.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: '{token}'")]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub token: String,
    pub highlighted: bool,
    pub span: Option<Span>,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, token: impl Into<String>, highlighted: bool) -> Self {
        Self {
            kind,
            token: token.into(),
            highlighted,
            span: None,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Tokens shorter than three characters are never highlighted.
    pub fn should_highlight(&self) -> bool {
        self.highlighted && self.token.chars().count() >= 3
    }
}

/// Ordered list of collected errors plus the "has errors" flag.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    errors: Vec<SyntaxError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: SyntaxError) {
        log::debug!("collected error: {}", error);
        self.errors.push(error);
    }

    pub fn add_error(&mut self, kind: ErrorKind, token: impl Into<String>, highlighted: bool) {
        self.add(SyntaxError::new(kind, token, highlighted));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

impl From<Vec<SyntaxError>> for ErrorLog {
    fn from(errors: Vec<SyntaxError>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_are_never_highlighted() {
        assert!(!SyntaxError::new(ErrorKind::UnexpectedInstruction, "si", true).should_highlight());
        let closer = SyntaxError::new(ErrorKind::UnexpectedInstruction, "finsi", true);
        assert!(closer.should_highlight());
        assert!(!SyntaxError::new(ErrorKind::InvalidDirection, "HAUT", false).should_highlight());
    }

    #[test]
    fn log_tracks_presence_of_errors() {
        let mut log = ErrorLog::new();
        assert!(!log.has_errors());
        log.add_error(ErrorKind::UnknownLabel, "fin", true);
        assert!(log.has_errors());
        assert_eq!(log.errors()[0].message(), "unknown label");
        assert_eq!(log.errors()[0].to_string(), "unknown label: 'fin'");
    }
}
