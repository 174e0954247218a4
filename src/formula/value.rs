use super::{EResult, EvalError};
use crate::common::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A scalar produced by a formula or stored in a [Context](crate::context::Context).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(Int),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "str",
        }
    }

    /// Booleans count as 0 and 1; strings have no numeric value.
    pub fn as_int(&self) -> Option<Int> {
        match self {
            Self::Bool(b) => Some(*b as Int),
            Self::Int(x) => Some(*x),
            Self::Str(_) => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(x) => *x != 0,
            Self::Str(s) => !s.is_empty(),
        }
    }

    /// Equality across types: numbers compare by value (`true == 1`), a
    /// string is only ever equal to an identical string.
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Str(_), _) | (_, Self::Str(_)) => false,
            (a, b) => a.as_int() == b.as_int(),
        }
    }

    pub(crate) fn ordering(&self, other: &Self, op: CompareOperator) -> EResult<Ordering> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Ok(a.cmp(b)),
            (a, b) => match (a.as_int(), b.as_int()) {
                (Some(x), Some(y)) => Ok(x.cmp(&y)),
                _ => Err(EvalError::type_mismatch(op, a, b)),
            },
        }
    }
}

impl From<Int> for Value {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Self::Int(x.into())
    }
}

impl From<bool> for Value {
    fn from(x: bool) -> Self {
        Self::Bool(x)
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Self::Str(x)
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Self::Str(x.to_owned())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => fmt::Display::fmt(b, f),
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Str(s) => fmt::Debug::fmt(s, f),
        }
    }
}
