use crate::accumulator::{numeric, StatAccumulator};
use crate::character::{Character, FeatureEffect, TargetType};
use crate::common::Int;
use crate::config::EngineConfig;
use crate::context::{build_context, Context};
use crate::formula;
use crate::resolve::ValueResolver;
use crate::sheet::{ResourcePool, Sheet};
use crate::Result;

/// Computes sheets. Holds nothing but its limits, so one engine can serve any
/// number of characters, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compute(&self, character: &Character) -> Result<Sheet> {
        let ctx = build_context(character)?;
        tracing::debug!(symbols = ctx.len(), "built context for {:?}", character.name);

        let mut acc = StatAccumulator::new(
            character
                .stats
                .iter()
                .map(|stat| (stat.key.as_str(), stat.base_value)),
        );

        let resources = ordered(&character.resources, |r| r.order);
        for resource in &resources {
            let kind = &resource.resource_type;
            let max = self.resource_max(&kind.max_formula, &ctx, &kind.key)?;
            tracing::trace!(resource = %kind.key, max, "seeded resource maximum");
            acc.set_max(kind.key.as_str(), max);
        }

        let resolver = ValueResolver::new(&ctx, &self.config);
        for feature in ordered(&character.features, |f| f.order) {
            for effect in ordered(&feature.effects, |e| e.order) {
                self.apply_effect(&resolver, &mut acc, effect)?;
            }
        }

        let resource_pools = resources
            .iter()
            .map(|resource| {
                let kind = &resource.resource_type;
                let pool = ResourcePool {
                    current: resource.current,
                    max: acc.resource_max(&kind.key),
                };
                (kind.name.clone(), pool)
            })
            .collect();

        let (stats, flags, _) = acc.into_parts();
        tracing::debug!(
            stats = stats.len(),
            flags = flags.len(),
            "computed sheet for {:?}",
            character.name
        );

        Ok(Sheet {
            base: ctx,
            stats,
            flags,
            resources: resource_pools,
        })
    }

    fn resource_max(&self, max_formula: &str, ctx: &Context, key: &str) -> Result<Int> {
        if max_formula.trim().is_empty() {
            return Ok(0);
        }
        let value = formula::parse_with(max_formula, &self.config)?.evaluate(ctx)?;
        Ok(numeric(&TargetType::ResourceMax, key, Some(value))?)
    }

    fn apply_effect(
        &self,
        resolver: &ValueResolver<'_>,
        acc: &mut StatAccumulator,
        effect: &FeatureEffect,
    ) -> Result<()> {
        if !effect.enabled {
            tracing::trace!(target_key = %effect.target_key, "skipped disabled effect");
            return Ok(());
        }

        let value = resolver.resolve(&effect.value_kind, &effect.value_str)?;
        tracing::trace!(
            target_type = %effect.target_type,
            target_key = %effect.target_key,
            operation = %effect.operation,
            ?value,
            "applying effect"
        );
        acc.apply(
            &effect.target_type,
            &effect.target_key,
            &effect.operation,
            value,
        )
    }
}

/// Computes a sheet with the default limits.
pub fn compute_sheet(character: &Character) -> Result<Sheet> {
    Engine::default().compute(character)
}

// Stable sort on the optional ordering key: unkeyed entries come first and keep
// the order they were supplied in, so input without keys is used as given.
fn ordered<T>(items: &[T], key: impl Fn(&T) -> Option<i64>) -> Vec<&T> {
    let mut items: Vec<&T> = items.iter().collect();
    items.sort_by_key(|item| key(item));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::*;
    use crate::error::{ErrorKind, SheetError};
    use crate::formula::{EvalError, Value};

    fn resource_type(key: &str, name: &str, max_formula: &str) -> ResourceType {
        ResourceType {
            key: key.into(),
            name: name.into(),
            max_formula: max_formula.into(),
            recovery: Recovery::LongRest,
        }
    }

    fn resource(kind: ResourceType, current: i64) -> Resource {
        Resource {
            resource_type: kind,
            current,
            order: None,
        }
    }

    fn feature(name: &str, effects: Vec<FeatureEffect>) -> Feature {
        Feature {
            name: name.into(),
            source: FeatureSource::Misc,
            effects,
            order: None,
        }
    }

    fn stat(key: &str, base_value: i64) -> Stat {
        Stat {
            key: key.into(),
            base_value,
        }
    }

    fn fighter() -> Character {
        Character {
            name: "Brakka".into(),
            str_val: 16,
            con_val: 14,
            classes: vec![CharacterClass {
                name: "fighter".into(),
                level: 5,
            }],
            stats: vec![stat("ac", 16), stat("initiative", 0)],
            ..Character::default()
        }
    }

    #[test]
    fn test_no_features_no_resources() {
        let character = fighter();
        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.stats.len(), 2);
        assert_eq!(sheet.stats["ac"], 16);
        assert_eq!(sheet.stats["initiative"], 0);
        assert!(sheet.flags.is_empty());
        assert!(sheet.resources.is_empty());
        assert_eq!(sheet.base, build_context(&character).unwrap());
    }

    #[test]
    fn test_add_then_set() {
        let mut character = fighter();
        character.features = vec![feature(
            "Armor",
            vec![
                FeatureEffect::new("stat", "ac", "add", "const", "true"),
                FeatureEffect::new("stat", "ac", "add", "formula", "1"),
                FeatureEffect::new("stat", "ac", "set", "formula", "15"),
            ],
        )];
        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.stats["ac"], 15);
    }

    #[test]
    fn test_effects_in_order() {
        let mut character = fighter();
        character.features = vec![
            feature(
                "Alert",
                vec![FeatureEffect::new(
                    "stat",
                    "initiative",
                    "add",
                    "reference",
                    "proficiency_bonus",
                )],
            ),
            feature(
                "Quick",
                vec![
                    FeatureEffect::new("stat", "initiative", "mul", "formula", "2"),
                    FeatureEffect::new("stat", "speed_bonus", "add", "formula", "str_mod * 5"),
                ],
            ),
        ];
        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.stats["initiative"], 6);
        assert_eq!(sheet.stats["speed_bonus"], 15);
    }

    #[test]
    fn test_disabled_effect_never_resolved() {
        let mut character = fighter();
        character.features = vec![feature(
            "Broken",
            vec![
                FeatureEffect::new("stat", "ac", "add", "formula", "((( +").disabled(),
                FeatureEffect::new("stat", "ac", "add", "formula", "nope").disabled(),
                FeatureEffect::new("bogus", "ac", "add", "mystery", "x").disabled(),
                FeatureEffect::new("stat", "ac", "add", "formula", "1"),
            ],
        )];
        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.stats["ac"], 17);
    }

    #[test]
    fn test_resources() {
        let mut character = fighter();
        let second_wind = resource_type("second_wind", "Second Wind", "");
        let surge = resource_type("action_surge", "Action Surge", "1 if fighter_level < 17 else 2");
        let hit_dice = resource_type("hit_dice", "Hit Dice", "level");
        character.resources = vec![
            resource(second_wind, 1),
            resource(surge, 5),
            resource(hit_dice, -2),
        ];
        character.features = vec![feature(
            "Tough",
            vec![FeatureEffect::new("resource_max", "hit_dice", "add", "reference", "con_mod")],
        )];

        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.resources.len(), 3);
        assert_eq!(sheet.resources["Second Wind"], ResourcePool { current: 1, max: 0 });
        assert_eq!(sheet.resources["Action Surge"], ResourcePool { current: 5, max: 1 });
        assert_eq!(sheet.resources["Hit Dice"], ResourcePool { current: -2, max: 7 });
    }

    #[test]
    fn test_duplicate_resource_type_last_wins() {
        let mut character = fighter();
        character.resources = vec![
            resource(resource_type("ki", "Ki", "level"), 2),
            resource(resource_type("ki", "Ki", "level * 2"), 4),
        ];
        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.resources["Ki"], ResourcePool { current: 4, max: 10 });
    }

    #[test]
    fn test_max_effect_without_resource_is_not_listed() {
        let mut character = fighter();
        character.features = vec![feature(
            "Stray",
            vec![FeatureEffect::new("resource_max", "sorcery_points", "add", "formula", "3")],
        )];
        let sheet = compute_sheet(&character).unwrap();
        assert!(sheet.resources.is_empty());
    }

    #[test]
    fn test_flags() {
        let mut character = fighter();
        character.features = vec![feature(
            "Senses",
            vec![
                FeatureEffect::new("flag", "darkvision", "toggle", "const", " TRUE"),
                FeatureEffect::new("flag", "darkvision", "toggle", "const", "true"),
                FeatureEffect::new("flag", "heavy_armor", "set", "formula", "str_val >= 15"),
                FeatureEffect::new("flag", "blessed", "set", "reference", "blessing"),
                FeatureEffect::new("flag", "sneaky", "toggle", "const", "false"),
            ],
        )];
        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.flags["darkvision"], true);
        assert_eq!(sheet.flags["heavy_armor"], true);
        assert_eq!(sheet.flags["blessed"], false);
        assert_eq!(sheet.flags["sneaky"], false);
    }

    #[test]
    fn test_explicit_order_keys() {
        let mut character = fighter();
        let mut set_first = FeatureEffect::new("stat", "ac", "set", "formula", "12");
        set_first.order = Some(1);
        let mut add_after = FeatureEffect::new("stat", "ac", "add", "formula", "2");
        add_after.order = Some(2);
        character.features = vec![feature("Ordered", vec![add_after, set_first])];

        let sheet = compute_sheet(&character).unwrap();
        assert_eq!(sheet.stats["ac"], 14);
    }

    #[test]
    fn test_errors_abort() {
        let mut character = fighter();
        character.features = vec![feature(
            "Bad",
            vec![FeatureEffect::new("stat", "ac", "add", "formula", "foo + 1")],
        )];
        assert_eq!(
            compute_sheet(&character),
            Err(SheetError::FormulaSymbol { name: "foo".into() })
        );

        character.features = vec![feature(
            "Bad",
            vec![FeatureEffect::new("stat", "ac", "add", "dice", "1d4")],
        )];
        assert_eq!(
            compute_sheet(&character).unwrap_err().kind(),
            ErrorKind::Configuration
        );

        character.features = vec![feature(
            "Bad",
            vec![FeatureEffect::new("stat", "ac", "div", "formula", "level - 5")],
        )];
        assert_eq!(
            compute_sheet(&character),
            Err(SheetError::FormulaEvaluation(EvalError::DivisionByZero))
        );
    }

    #[test]
    fn test_level_overflow_aborts() {
        let mut character = fighter();
        character.classes = vec![
            CharacterClass {
                name: "a".into(),
                level: Int::MAX,
            },
            CharacterClass {
                name: "b".into(),
                level: 1,
            },
        ];
        assert_eq!(
            compute_sheet(&character),
            Err(SheetError::FormulaEvaluation(EvalError::Overflow))
        );
    }

    #[test]
    fn test_bad_resource_formula_aborts() {
        let mut character = fighter();
        character.resources = vec![resource(resource_type("rage", "Rage", "barbarian_level"), 0)];
        assert_eq!(
            compute_sheet(&character),
            Err(SheetError::FormulaSymbol {
                name: "barbarian_level".into()
            })
        );
    }

    #[test]
    fn test_engine_limits() {
        let mut character = fighter();
        character.features = vec![feature(
            "Long",
            vec![FeatureEffect::new("stat", "ac", "add", "formula", "1 + 1 + 1 + 1")],
        )];
        let engine = Engine::new(EngineConfig::new(8, 64));
        assert_eq!(
            engine.compute(&character).unwrap_err().kind(),
            ErrorKind::FormulaSyntax
        );
        assert_eq!(compute_sheet(&character).unwrap().stats["ac"], 20);
    }

    #[test]
    fn test_sheet_json() {
        let mut character = fighter();
        character.resources = vec![resource(resource_type("sw", "Second Wind", "1"), 1)];
        character.features = vec![feature(
            "Style",
            vec![FeatureEffect::new("flag", "defense_style", "set", "const", "true")],
        )];
        let sheet = compute_sheet(&character).unwrap();
        let json = serde_json::to_value(&sheet).unwrap();

        assert_eq!(json["base"]["str_mod"], 3);
        assert_eq!(json["base"]["fighter_level"], 5);
        assert_eq!(json["stats"]["ac"], 16);
        assert_eq!(json["flags"]["defense_style"], true);
        assert_eq!(json["resources"]["Second Wind"]["current"], 1);
        assert_eq!(json["resources"]["Second Wind"]["max"], 1);
        assert_eq!(sheet.base.get("level"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
