use crate::character::{Operation, TargetType};
use crate::common::*;
use crate::formula::{EvalError, Value};
use crate::{Result, SheetError};
use std::collections::BTreeMap;

/// Working state built up while effects are applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatAccumulator {
    stats: BTreeMap<String, Int>,
    flags: BTreeMap<String, bool>,
    resource_max: BTreeMap<String, Int>,
}

impl StatAccumulator {
    pub fn new<K: Into<String>>(stats: impl IntoIterator<Item = (K, Int)>) -> Self {
        Self {
            stats: stats.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::default()
        }
    }

    pub fn stat(&self, key: &str) -> Int {
        self.stats.get(key).copied().unwrap_or(0)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    pub fn resource_max(&self, key: &str) -> Int {
        self.resource_max.get(key).copied().unwrap_or(0)
    }

    pub fn set_max(&mut self, key: impl Into<String>, value: Int) {
        self.resource_max.insert(key.into(), value);
    }

    /// Applies one resolved effect value.
    ///
    /// Flags ignore `op` and store the truthiness of `value`, so `toggle` is
    /// really "set to". Numeric targets treat any operation other than
    /// add/sub/mul/div as `set`.
    pub fn apply(
        &mut self,
        target: &TargetType,
        key: &str,
        op: &Operation,
        value: Option<Value>,
    ) -> Result<()> {
        let map = match target {
            TargetType::Flag => {
                let flag = value.map_or(false, |v| v.truthy());
                self.flags.insert(key.to_owned(), flag);
                return Ok(());
            }
            TargetType::Stat => &mut self.stats,
            TargetType::ResourceMax => &mut self.resource_max,
            TargetType::Unrecognized(other) => {
                return Err(SheetError::configuration(format!(
                    "unknown target type: {:?}",
                    other
                )))
            }
        };

        let value = numeric(target, key, value)?;
        accumulate(map, key, op, value)?;
        Ok(())
    }

    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, Int>,
        BTreeMap<String, bool>,
        BTreeMap<String, Int>,
    ) {
        (self.stats, self.flags, self.resource_max)
    }
}

/// Integers pass through and booleans count as 0/1; nothing else can be
/// stored in a numeric map.
pub(crate) fn numeric(target: &TargetType, key: &str, value: Option<Value>) -> Result<Int, EvalError> {
    let found = match &value {
        Some(v) => match v.as_int() {
            Some(x) => return Ok(x),
            None => v.type_name(),
        },
        None => "no value",
    };
    Err(EvalError::NotNumeric {
        target: format!("{} '{}'", target, key),
        found,
    })
}

fn accumulate(
    map: &mut BTreeMap<String, Int>,
    key: &str,
    op: &Operation,
    value: Int,
) -> Result<(), EvalError> {
    let current = map.get(key).copied().unwrap_or(0);
    let next = match op {
        Operation::Add => current.checked_add(value).ok_or(EvalError::Overflow)?,
        Operation::Sub => current.checked_sub(value).ok_or(EvalError::Overflow)?,
        Operation::Mul => current.checked_mul(value).ok_or(EvalError::Overflow)?,
        Operation::Div => floor_div(current, value)?,
        Operation::Set | Operation::Toggle | Operation::Other(_) => value,
    };
    map.insert(key.to_owned(), next);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn apply(acc: &mut StatAccumulator, target: &str, key: &str, op: &str, value: Value) -> Result<()> {
        acc.apply(&target.into(), key, &op.into(), Some(value))
    }

    #[test]
    fn test_numeric_ops() {
        let mut acc = StatAccumulator::new([("ac", 10)]);
        apply(&mut acc, "stat", "ac", "add", Value::Int(3)).unwrap();
        assert_eq!(acc.stat("ac"), 13);
        apply(&mut acc, "stat", "ac", "sub", Value::Int(1)).unwrap();
        assert_eq!(acc.stat("ac"), 12);
        apply(&mut acc, "stat", "ac", "mul", Value::Int(2)).unwrap();
        assert_eq!(acc.stat("ac"), 24);
        apply(&mut acc, "stat", "ac", "div", Value::Int(5)).unwrap();
        assert_eq!(acc.stat("ac"), 4);
        apply(&mut acc, "stat", "ac", "div", Value::Int(-3)).unwrap();
        assert_eq!(acc.stat("ac"), -2);
    }

    #[test]
    fn test_missing_key_reads_zero() {
        let mut acc = StatAccumulator::default();
        apply(&mut acc, "stat", "initiative", "add", Value::Int(2)).unwrap();
        assert_eq!(acc.stat("initiative"), 2);
        apply(&mut acc, "stat", "speed_bonus", "sub", Value::Int(5)).unwrap();
        assert_eq!(acc.stat("speed_bonus"), -5);
        apply(&mut acc, "resource_max", "ki", "mul", Value::Int(5)).unwrap();
        assert_eq!(acc.resource_max("ki"), 0);
    }

    #[test]
    fn test_set_overrides_history() {
        let mut acc = StatAccumulator::new([("ac", 10)]);
        apply(&mut acc, "stat", "ac", "add", Value::Int(2)).unwrap();
        apply(&mut acc, "stat", "ac", "set", Value::Int(15)).unwrap();
        assert_eq!(acc.stat("ac"), 15);
    }

    #[test]
    fn test_unknown_operations_fall_back_to_set() {
        let mut acc = StatAccumulator::new([("ac", 10)]);
        apply(&mut acc, "stat", "ac", "toggle", Value::Int(7)).unwrap();
        assert_eq!(acc.stat("ac"), 7);
        apply(&mut acc, "resource_max", "rage", "pow", Value::Int(3)).unwrap();
        assert_eq!(acc.resource_max("rage"), 3);
    }

    #[test]
    fn test_division_by_zero() {
        let mut acc = StatAccumulator::new([("ac", 10)]);
        assert_eq!(
            apply(&mut acc, "stat", "ac", "div", Value::Int(0)),
            Err(SheetError::FormulaEvaluation(EvalError::DivisionByZero))
        );
        assert_eq!(acc.stat("ac"), 10);
    }

    #[test]
    fn test_flags_ignore_operation() {
        let mut acc = StatAccumulator::default();
        apply(&mut acc, "flag", "darkvision", "toggle", Value::Bool(true)).unwrap();
        assert_eq!(acc.flag("darkvision"), Some(true));
        apply(&mut acc, "flag", "darkvision", "toggle", Value::Bool(true)).unwrap();
        assert_eq!(acc.flag("darkvision"), Some(true));
        apply(&mut acc, "flag", "darkvision", "add", Value::Int(0)).unwrap();
        assert_eq!(acc.flag("darkvision"), Some(false));
        apply(&mut acc, "flag", "named", "set", Value::from("yes")).unwrap();
        assert_eq!(acc.flag("named"), Some(true));

        acc.apply(&TargetType::Flag, "missing_ref", &Operation::Set, None)
            .unwrap();
        assert_eq!(acc.flag("missing_ref"), Some(false));
    }

    #[test]
    fn test_booleans_count_as_integers() {
        let mut acc = StatAccumulator::new([("attacks", 1)]);
        apply(&mut acc, "stat", "attacks", "add", Value::Bool(true)).unwrap();
        assert_eq!(acc.stat("attacks"), 2);
    }

    #[test]
    fn test_non_numeric_values() {
        let mut acc = StatAccumulator::new([("ac", 10)]);
        assert_eq!(
            apply(&mut acc, "stat", "ac", "add", Value::from("2")),
            Err(SheetError::FormulaEvaluation(EvalError::NotNumeric {
                target: "stat 'ac'".into(),
                found: "str",
            }))
        );
        assert_eq!(
            acc.apply(&TargetType::ResourceMax, "ki", &Operation::Set, None)
                .unwrap_err()
                .kind(),
            ErrorKind::FormulaEvaluation
        );
    }

    #[test]
    fn test_unknown_target() {
        let mut acc = StatAccumulator::default();
        assert_eq!(
            apply(&mut acc, "skill", "stealth", "add", Value::Int(1))
                .unwrap_err()
                .kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_overflow() {
        let mut acc = StatAccumulator::new([("hp", Int::MAX)]);
        assert_eq!(
            apply(&mut acc, "stat", "hp", "add", Value::Int(1)),
            Err(SheetError::FormulaEvaluation(EvalError::Overflow))
        );
    }
}
