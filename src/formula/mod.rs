//! The sandboxed formula language used by resource maxima and feature effects.
//!
//! A formula is parsed into an [Expression], every identifier in it is checked
//! against the function whitelist and the [Context], and only then is the tree
//! evaluated. There is no way for a formula to reach anything else.

pub mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod value;

use crate::common::Function;
use crate::config::EngineConfig;
use crate::context::Context;
use ast::Evaluate;

pub use ast::Expression;
pub use error::{EvalError, FormulaError, ParseError, ParseErrorKind};
pub use lexer::TokenKind;
pub use value::Value;

pub type EResult<T> = Result<T, EvalError>;

/// Parses `s` with the default limits.
pub fn parse(s: &str) -> Result<Expression, ParseError> {
    parser::parse_with(s, &EngineConfig::default())
}

/// Parses `s` with the limits in `config`.
pub fn parse_with(s: &str, config: &EngineConfig) -> Result<Expression, ParseError> {
    parser::parse_with(s, config)
}

/// Parses and evaluates `s` against `ctx` with the default limits.
///
/// ```
/// # use sheet_calc::{context::Context, formula::{self, Value}};
/// let ctx = Context::from_iter([("level", 5)]);
/// assert_eq!(formula::evaluate("2 + (level - 1) / 4", &ctx), Ok(Value::Int(3)));
/// ```
pub fn evaluate(s: &str, ctx: &Context) -> Result<Value, FormulaError> {
    parse(s)?.evaluate(ctx)
}

impl Expression {
    /// Fails on the first identifier that is neither a whitelisted function
    /// nor a context symbol.
    pub fn check(&self, ctx: &Context) -> Result<(), FormulaError> {
        match self
            .symbols()
            .into_iter()
            .find(|name| Function::from_name(name).is_none() && !ctx.contains(name))
        {
            Some(name) => Err(FormulaError::UnknownSymbol(name.to_owned())),
            None => Ok(()),
        }
    }

    pub fn evaluate(&self, ctx: &Context) -> Result<Value, FormulaError> {
        self.check(ctx)?;
        Ok(self.root.evaluate(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::from_iter([("str_mod", 2), ("level", 3)])
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(
            evaluate("foo + 1", &ctx()),
            Err(FormulaError::UnknownSymbol("foo".into()))
        );
    }

    #[test]
    fn test_unknown_symbol_in_skipped_branch() {
        assert_eq!(
            evaluate("true or unknown_symbol", &ctx()),
            Err(FormulaError::UnknownSymbol("unknown_symbol".into()))
        );
        assert_eq!(
            evaluate("1 if true else missing", &ctx()),
            Err(FormulaError::UnknownSymbol("missing".into()))
        );
    }

    #[test]
    fn test_unknown_symbol_reported_before_runtime_errors() {
        assert_eq!(
            evaluate("1 / 0 + nope", &ctx()),
            Err(FormulaError::UnknownSymbol("nope".into()))
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            evaluate("exec(1)", &ctx()),
            Err(FormulaError::UnknownSymbol("exec".into()))
        );
    }

    #[test]
    fn test_first_missing_symbol_in_source_order() {
        assert_eq!(
            evaluate("max(a, str_mod) + b", &ctx()),
            Err(FormulaError::UnknownSymbol("a".into()))
        );
    }

    #[test]
    fn test_symbols() {
        let expr = parse("max(str_mod, level) + str_mod if flag else other").unwrap();
        assert_eq!(
            expr.symbols(),
            vec!["max", "str_mod", "level", "flag", "other"]
        );
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            evaluate("str_mod +", &ctx()),
            Err(FormulaError::Syntax(_))
        ));
    }

    #[test]
    fn test_evaluate() {
        assert_eq!(evaluate("str_mod * level", &ctx()), Ok(Value::Int(6)));
        assert_eq!(evaluate("level >= 3", &ctx()), Ok(Value::Bool(true)));
    }
}
