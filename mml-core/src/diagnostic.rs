//! Renderable diagnostics.
//!
//! The pipeline reports failures as typed errors (`ParseError`,
//! `TypeError`). Front ends convert them into `Diagnostic`s when they
//! need something to print.

use core::fmt;

use crate::error::{CoreError, ParseError, TypeError};
use crate::span::Span;

/// An error ready for display, with an optional `E0xxx` code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: Option<&'static str>,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            code: None,
            message: message.into(),
            span,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Diagnostic::error(err.to_string(), err.span).with_code("E0101")
    }
}

impl From<&TypeError> for Diagnostic {
    fn from(err: &TypeError) -> Self {
        Diagnostic::error(err.to_string(), err.span()).with_code(err.code())
    }
}

/// Expand a pipeline error into one diagnostic per underlying failure.
pub fn diagnostics_for(err: &CoreError) -> Vec<Diagnostic> {
    match err {
        CoreError::Parse(parse) => vec![Diagnostic::from(parse)],
        CoreError::TypeCheck(errors) => errors.iter().map(Diagnostic::from).collect(),
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "error[{code}]: {}", self.message)?,
            None => write!(f, "error: {}", self.message)?,
        }
        write!(f, "\n --> {}", self.span)
    }
}
