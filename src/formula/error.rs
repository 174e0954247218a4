use super::{lexer::TokenKind, Value};
use crate::common::*;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error("unknown symbol in formula: {0}")]
    UnknownSymbol(String),
    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: NonEmpty<TokenKind>,
    },
    UnrecognizedInput {
        expected: NonEmpty<TokenKind>,
    },
    TrailingInput(TokenKind),
    IntegerOutOfRange,
    TooLong {
        len: usize,
        max: usize,
    },
    TooDeep {
        max: usize,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                found: Some(found),
                expected,
            } => write!(
                f,
                "unexpected token: found {}, expected {}",
                found,
                expected.fmt_expected()
            ),
            Self::UnexpectedToken {
                found: None,
                expected,
            } => write!(
                f,
                "unexpected end of formula, expected {}",
                expected.fmt_expected()
            ),
            Self::UnrecognizedInput { expected } => {
                write!(f, "expected {}", expected.fmt_expected())
            }
            Self::TrailingInput(found) => write!(f, "unexpected {} after expression", found),
            Self::IntegerOutOfRange => f.write_str("integer literal out of range"),
            Self::TooLong { len, max } => {
                write!(f, "formula is {} bytes long, the limit is {}", len, max)
            }
            Self::TooDeep { max } => write!(f, "formula nests deeper than {} levels", max),
        }
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [TokenKind] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => unreachable!("NonEmpty cannot be empty"),
            [a] => a.to_string(),
            [a, b] => format!("{} or {}", a, b),
            s => {
                let head: Vec<_> = s[..s.len() - 1].iter().map(TokenKind::to_str).collect();
                format!("{}, or {}", head.join(", "), s[s.len() - 1])
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("cannot divide by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("unsupported operand types for {op}: {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("bad operand type for {op}: {operand}")]
    BadOperand { op: String, operand: &'static str },
    #[error("{target} needs an integer value, found {found}")]
    NotNumeric { target: String, found: &'static str },
    #[error("{function}() takes {expected} argument(s), {found} given")]
    Arity {
        function: Function,
        expected: &'static str,
        found: usize,
    },
    #[error("'{0}' is not callable")]
    NotCallable(String),
    #[error("function '{0}' cannot be used as a value")]
    NotAValue(String),
    #[error("symbol '{0}' is not bound")]
    Unbound(String),
}

impl EvalError {
    pub(crate) fn type_mismatch(op: impl fmt::Display, left: &Value, right: &Value) -> Self {
        Self::TypeMismatch {
            op: op.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }
    }

    pub(crate) fn bad_operand(op: impl fmt::Display, operand: &Value) -> Self {
        Self::BadOperand {
            op: op.to_string(),
            operand: operand.type_name(),
        }
    }
}
