use thiserror::Error;

use crate::ast::BinOp;
use crate::span::Span;
use crate::types::Type;

/// Grammar violation. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {}, column {}: {message}, found {}", .span.line, .span.column, describe_lexeme(.lexeme))]
pub struct ParseError {
    pub message: String,
    /// Text of the offending token; empty at end of input.
    pub lexeme: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, lexeme: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }
}

fn describe_lexeme(lexeme: &str) -> String {
    if lexeme.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{lexeme}'")
    }
}

/// A single type-checking failure. The checker collects all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type mismatch in variable declaration '{name}': expected {expected}, got {found}")]
    Mismatch {
        name: String,
        expected: Type,
        found: Type,
        span: Span,
    },
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },
    #[error("invalid operand types for operator '{op}': {left} and {right}")]
    InvalidOperands {
        op: BinOp,
        left: Type,
        right: Type,
        span: Span,
    },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::Mismatch { span, .. }
            | TypeError::UndefinedVariable { span, .. }
            | TypeError::InvalidOperands { span, .. } => *span,
        }
    }

    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::Mismatch { .. } => "E0201",
            TypeError::UndefinedVariable { .. } => "E0202",
            TypeError::InvalidOperands { .. } => "E0203",
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("type checking failed with {} error(s)", .0.len())]
    TypeCheck(Vec<TypeError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_mentions_position_and_lexeme() {
        let err = ParseError::new("unexpected token", "]", Span::new(3, 7));
        assert_eq!(
            err.to_string(),
            "parse error at line 3, column 7: unexpected token, found ']'"
        );
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn parse_error_at_eof_says_end_of_input() {
        let err = ParseError::new("expected ')'", "", Span::new(1, 9));
        assert!(err.to_string().ends_with("found end of input"));
    }

    #[test]
    fn type_errors_render_operands() {
        let err = TypeError::InvalidOperands {
            op: BinOp::Sub,
            left: Type::Vec,
            right: Type::Int,
            span: Span::new(1, 14),
        };
        assert_eq!(
            err.to_string(),
            "invalid operand types for operator '-': vec and int"
        );
        assert_eq!(err.code(), "E0203");
        assert_eq!(err.span(), Span::new(1, 14));
    }

    #[test]
    fn type_check_error_counts() {
        let err = CoreError::TypeCheck(vec![TypeError::UndefinedVariable {
            name: "x".into(),
            span: Span::new(1, 7),
        }]);
        assert_eq!(err.to_string(), "type checking failed with 1 error(s)");
    }
}
