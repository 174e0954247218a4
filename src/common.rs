use crate::formula::EvalError;
use std::fmt::{self, Write};
pub use vec1::vec1;

pub type Int = i64;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOperator {
    Pos,
    Neg,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pos => f.write_char('+'),
            Self::Neg => f.write_char('-'),
            Self::Not => f.write_str("not"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Flr,
    Rem,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Flr => "//",
            Self::Rem => "%",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CompareOperator {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
        }
    }
}

/// The functions a formula is allowed to call. Nothing outside this table
/// can be reached from a formula.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Function {
    Abs,
    Min,
    Max,
    Round,
    Ceil,
    Floor,
}

impl Function {
    pub const ALL: &'static [Self] = &[
        Self::Abs,
        Self::Min,
        Self::Max,
        Self::Round,
        Self::Ceil,
        Self::Floor,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
            Self::Round => "round",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer division rounding toward negative infinity.
pub fn floor_div(x: Int, y: Int) -> Result<Int, EvalError> {
    if y == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let q = x.checked_div(y).ok_or(EvalError::Overflow)?;
    if x % y != 0 && (x < 0) != (y < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder carrying the sign of the divisor, the counterpart of [floor_div].
pub fn floor_mod(x: Int, y: Int) -> Result<Int, EvalError> {
    if y == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let r = x.checked_rem(y).ok_or(EvalError::Overflow)?;
    if r != 0 && (r < 0) != (y < 0) {
        Ok(r + y)
    } else {
        Ok(r)
    }
}
