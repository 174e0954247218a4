use crate::character::ValueKind;
use crate::config::EngineConfig;
use crate::context::Context;
use crate::formula::{self, Value};
use crate::{Result, SheetError};

/// Turns an effect's `(value_kind, value_str)` pair into a value.
pub struct ValueResolver<'a> {
    ctx: &'a Context,
    config: &'a EngineConfig,
}

impl<'a> ValueResolver<'a> {
    pub fn new(ctx: &'a Context, config: &'a EngineConfig) -> Self {
        Self { ctx, config }
    }

    /// `None` means a reference that named no symbol; that miss is not an error.
    pub fn resolve(&self, kind: &ValueKind, raw: &str) -> Result<Option<Value>> {
        match kind {
            ValueKind::Const => Ok(Some(constant(raw))),
            ValueKind::Reference => Ok(self.ctx.get(raw).cloned()),
            ValueKind::Formula => {
                let value = formula::parse_with(raw, self.config)?.evaluate(self.ctx)?;
                Ok(Some(value))
            }
            ValueKind::Unrecognized(other) => Err(SheetError::configuration(format!(
                "unknown value kind: {:?}",
                other
            ))),
        }
    }
}

// The trimmed, lowercased copy is only for spotting booleans; any other
// constant is returned exactly as written.
fn constant(raw: &str) -> Value {
    match raw.trim().to_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(raw.to_owned()),
    }
}
