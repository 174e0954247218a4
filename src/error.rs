use crate::formula::{EvalError, FormulaError, ParseError};

/// Everything that can stop a sheet from being computed. Each variant is
/// terminal: the pipeline returns exactly one of these or a complete sheet.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("formula syntax error: {0}")]
    FormulaSyntax(#[from] ParseError),
    #[error("unknown symbol in formula: {name}")]
    FormulaSymbol { name: String },
    #[error("formula evaluation error: {0}")]
    FormulaEvaluation(#[from] EvalError),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Configuration,
    FormulaSyntax,
    FormulaSymbol,
    FormulaEvaluation,
}

impl SheetError {
    pub fn configuration(msg: impl ToString) -> Self {
        Self::Configuration(msg.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::FormulaSyntax(_) => ErrorKind::FormulaSyntax,
            Self::FormulaSymbol { .. } => ErrorKind::FormulaSymbol,
            Self::FormulaEvaluation(_) => ErrorKind::FormulaEvaluation,
        }
    }
}

impl From<FormulaError> for SheetError {
    fn from(err: FormulaError) -> Self {
        match err {
            FormulaError::Syntax(e) => Self::FormulaSyntax(e),
            FormulaError::UnknownSymbol(name) => Self::FormulaSymbol { name },
            FormulaError::Evaluation(e) => Self::FormulaEvaluation(e),
        }
    }
}
