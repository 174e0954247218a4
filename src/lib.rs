//! Computes a character sheet from a character aggregate and its ordered
//! feature effects.
//!
//! ```
//! use sheet_calc::character::{Character, CharacterClass, Feature, FeatureEffect, FeatureSource, Stat};
//!
//! let character = Character {
//!     dex_val: 14,
//!     classes: vec![CharacterClass { name: "rogue".into(), level: 2 }],
//!     stats: vec![Stat { key: "ac".into(), base_value: 11 }],
//!     features: vec![Feature {
//!         name: "Leather Armor".into(),
//!         source: FeatureSource::Item,
//!         effects: vec![FeatureEffect::new("stat", "ac", "add", "formula", "dex_mod")],
//!         order: None,
//!     }],
//!     ..Character::default()
//! };
//!
//! let sheet = sheet_calc::compute_sheet(&character).unwrap();
//! assert_eq!(sheet.stats["ac"], 13);
//! ```

pub mod accumulator;
pub mod character;
pub mod common;
pub mod config;
pub mod context;
pub mod error;
pub mod formula;
pub mod pipeline;
pub mod resolve;
pub mod sheet;

pub use character::Character;
pub use common::{Function, Int};
pub use config::EngineConfig;
pub use error::{ErrorKind, SheetError};
pub use pipeline::{compute_sheet, Engine};
pub use sheet::{ResourcePool, Sheet};

pub type Result<T, E = SheetError> = std::result::Result<T, E>;
