//! The read-only character aggregate the engine computes a sheet from.
//!
//! Field defaults mirror what a freshly created character has in storage, so a
//! sparse JSON document decodes into something computable.

use crate::common::Int;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    /// Kept for the storage layer; the engine derives the level from `classes`.
    pub level: Int,

    pub str_val: Int,
    pub dex_val: Int,
    pub con_val: Int,
    pub int_val: Int,
    pub wis_val: Int,
    pub cha_val: Int,

    pub base_hp: Int,
    pub base_ac: Int,
    pub speed: Int,

    pub classes: Vec<CharacterClass>,
    pub stats: Vec<Stat>,
    pub resources: Vec<Resource>,
    pub features: Vec<Feature>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: 1,
            str_val: 10,
            dex_val: 10,
            con_val: 10,
            int_val: 10,
            wis_val: 10,
            cha_val: 10,
            base_hp: 1,
            base_ac: 10,
            speed: 30,
            classes: Vec::new(),
            stats: Vec::new(),
            resources: Vec::new(),
            features: Vec::new(),
        }
    }
}

impl Character {
    pub fn score(&self, ability: Ability) -> Int {
        match ability {
            Ability::Str => self.str_val,
            Ability::Dex => self.dex_val,
            Ability::Con => self.con_val,
            Ability::Int => self.int_val,
            Ability::Wis => self.wis_val,
            Ability::Cha => self.cha_val,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: &'static [Self] = &[
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub name: String,
    #[serde(default = "default_class_level")]
    pub level: Int,
}

fn default_class_level() -> Int {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub key: String,
    #[serde(default)]
    pub base_value: Int,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    ShortRest,
    LongRest,
    Daily,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub max_formula: String,
    /// Not read by the engine.
    pub recovery: Recovery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_type: ResourceType,
    /// Never clamped against the computed maximum.
    #[serde(default)]
    pub current: Int,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    Race,
    Class,
    Item,
    Spell,
    Feat,
    Misc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub source: FeatureSource,
    #[serde(default)]
    pub effects: Vec<FeatureEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEffect {
    pub target_type: TargetType,
    pub target_key: String,
    pub operation: Operation,
    pub value_kind: ValueKind,
    pub value_str: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

fn default_enabled() -> bool {
    true
}

impl FeatureEffect {
    pub fn new(
        target_type: impl Into<TargetType>,
        target_key: impl Into<String>,
        operation: impl Into<Operation>,
        value_kind: impl Into<ValueKind>,
        value_str: impl Into<String>,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            target_key: target_key.into(),
            operation: operation.into(),
            value_kind: value_kind.into(),
            value_str: value_str.into(),
            enabled: true,
            order: None,
        }
    }

    pub fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

// Tags arrive as free-form strings from storage. Unknown spellings are kept in
// the fallback variant instead of failing to decode; what happens to them is
// decided when the effect is applied.
macro_rules! string_tag {
    ($Name:ident, $Fallback:ident { $($Variant:ident => $tag:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $Name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$Variant => $tag,)+
                    Self::$Fallback(raw) => raw,
                }
            }
        }

        impl From<&str> for $Name {
            fn from(s: &str) -> Self {
                match s {
                    $($tag $(| $alias)* => Self::$Variant,)+
                    other => Self::$Fallback(other.to_owned()),
                }
            }
        }

        impl From<String> for $Name {
            fn from(s: String) -> Self {
                Self::from(s.as_str())
            }
        }

        impl From<$Name> for String {
            fn from(x: $Name) -> Self {
                x.as_str().to_owned()
            }
        }

        impl fmt::Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetType {
    Stat,
    Flag,
    ResourceMax,
    Unrecognized(String),
}

string_tag!(TargetType, Unrecognized {
    Stat => "stat",
    Flag => "flag",
    ResourceMax => "resource_max",
});

/// How an effect combines its value with the target.
///
/// Only numeric targets look at the operation, and anything that is not
/// `add`/`sub`/`mul`/`div` (including `toggle`) overwrites like `set`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Set,
    Toggle,
    Other(String),
}

string_tag!(Operation, Other {
    Add => "add",
    Sub => "sub",
    Mul => "mul",
    Div => "div",
    Set => "set",
    Toggle => "toggle",
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueKind {
    Const,
    Reference,
    Formula,
    Unrecognized(String),
}

string_tag!(ValueKind, Unrecognized {
    Const => "const",
    Reference => "reference" | "ref",
    Formula => "formula",
});
