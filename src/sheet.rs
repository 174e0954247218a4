use crate::common::Int;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The computed character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// The symbol table every formula was evaluated against.
    pub base: Context,
    pub stats: BTreeMap<String, Int>,
    pub flags: BTreeMap<String, bool>,
    /// Keyed by resource type display name.
    pub resources: BTreeMap<String, ResourcePool>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub current: Int,
    pub max: Int,
}
