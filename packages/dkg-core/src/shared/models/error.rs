//! Typed errors for the DKG pipeline.
//!
//! One error type spans the whole crate; each stage maps its failures onto
//! an `ErrorKind` so callers can branch on category without matching every
//! variant.

use thiserror::Error;

/// Broad category a `DkgError` falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    IrNormalization,
    Constraint,
    Timing,
    ViewBuild,
    Analysis,
    Query,
    Storage,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::IrNormalization => "ir_normalization",
            Self::Constraint => "constraint",
            Self::Timing => "timing",
            Self::ViewBuild => "view_build",
            Self::Analysis => "analysis",
            Self::Query => "query",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

#[derive(Error, Debug)]
#[error("[{kind:?}] {message}{}", file_suffix(.file.as_deref(), *.line))]
pub struct DkgError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

fn file_suffix(file: Option<&str>, line: Option<u32>) -> String {
    match (file, line) {
        (Some(f), Some(l)) => format!(" in {f}:{l}"),
        (Some(f), None) => format!(" in {f}"),
        _ => String::new(),
    }
}

impl DkgError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            line: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn ir_normalization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IrNormalization, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Constraint, message)
    }

    pub fn timing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timing, message)
    }

    pub fn view_build(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ViewBuild, message)
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Analysis, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Query, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<serde_json::Error> for DkgError {
    fn from(e: serde_json::Error) -> Self {
        DkgError::new(ErrorKind::Parse, e.to_string()).with_source(e)
    }
}

impl From<std::io::Error> for DkgError {
    fn from(e: std::io::Error) -> Self {
        DkgError::new(ErrorKind::Storage, e.to_string()).with_source(e)
    }
}

pub type DkgResult<T> = std::result::Result<T, DkgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_file_and_line() {
        let err = DkgError::parse("unexpected token").with_file("top.json").with_line(12);
        assert_eq!(err.to_string(), "[Parse] unexpected token in top.json:12");
    }

    #[test]
    fn display_without_location() {
        let err = DkgError::internal("unreachable");
        assert_eq!(err.to_string(), "[Internal] unreachable");
    }
}
