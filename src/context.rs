use crate::character::{Ability, Character};
use crate::common::*;
use crate::formula::{EvalError, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The symbol table formulas are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    symbols: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.symbols.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

pub fn ability_modifier(score: Int) -> Int {
    score.div_euclid(2) - 5
}

pub fn proficiency_bonus(total_level: Int) -> Int {
    2 + (total_level.max(1) - 1).div_euclid(4)
}

/// Derives the base symbol table for `character`.
///
/// Exposes `level`/`total_level`, `proficiency_bonus`, `<ability>_val` and
/// `<ability>_mod` for all six abilities, `base_hp`, `base_ac`, `speed`, and
/// `<class>_level` for each class. A class listed twice keeps its last level.
/// Fails with [EvalError::Overflow] when the class levels do not sum to an [Int].
pub fn build_context(character: &Character) -> Result<Context, EvalError> {
    let total_level = character
        .classes
        .iter()
        .try_fold(0 as Int, |acc, c| acc.checked_add(c.level))
        .ok_or(EvalError::Overflow)?;

    let mut ctx = Context::new();
    ctx.insert("level", total_level);
    ctx.insert("total_level", total_level);
    ctx.insert("proficiency_bonus", proficiency_bonus(total_level));

    for &ability in Ability::ALL {
        let score = character.score(ability);
        ctx.insert(format!("{}_val", ability.prefix()), score);
        ctx.insert(format!("{}_mod", ability.prefix()), ability_modifier(score));
    }

    ctx.insert("base_hp", character.base_hp);
    ctx.insert("base_ac", character.base_ac);
    ctx.insert("speed", character.speed);

    for class in &character.classes {
        ctx.insert(format!("{}_level", class.name), class.level);
    }

    Ok(ctx)
}
