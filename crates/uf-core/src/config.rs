//! Core configuration.
//!
//! The host owns the mod configuration file; it deserializes one of these and
//! passes it by reference into every core operation. There is no global
//! config state and no caching beyond the duration of one call.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Severity class of a poisonous food, scaling its onset delay.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum PoisonClass {
    /// Unpleasant but survivable on its own.
    #[default]
    Mild,
    /// Dangerous in quantity.
    Strong,
    /// Deadly even in small amounts.
    Lethal,
}

/// Onset-delay adjustment for one poison class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnsetScale {
    /// Multiplier applied to both onset bounds.
    pub multiplier: f64,
    /// Hours added to both onset bounds after scaling.
    pub add_hours: f64,
}

impl Default for OnsetScale {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            add_hours: 0.0,
        }
    }
}

/// Onset scales per poison class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassScales {
    pub mild: OnsetScale,
    pub strong: OnsetScale,
    pub lethal: OnsetScale,
}

/// Damage-band fallback used to classify an item with no explicit class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassBands {
    /// Damage at or below this is mild.
    pub mild_max_damage: f64,
    /// Damage at or below this (and above the mild band) is strong.
    pub strong_max_damage: f64,
}

impl Default for ClassBands {
    fn default() -> Self {
        Self {
            mild_max_damage: 2.0,
            strong_max_damage: 6.0,
        }
    }
}

/// Configuration snapshot for the unknown-food core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Master switch for delayed poison onset. When false, poison damage
    /// passes through the pipeline untouched.
    pub poison_enabled: bool,
    /// Lower bound of the base onset delay, in in-game hours.
    pub onset_min_hours: f64,
    /// Upper bound of the base onset delay, in in-game hours.
    pub onset_max_hours: f64,
    /// Total pending damage at or above which the queue escalates to an
    /// immediate lethal application. Disabled when <= 0.
    pub instant_death_threshold: f64,
    /// Knowledge progress gained per eat of an unknown food.
    pub learn_per_eat: f32,
    /// Whether a player's food knowledge resets on death.
    pub forget_on_death: bool,
    /// Per-class onset adjustments.
    pub class_scales: ClassScales,
    /// Damage-band classification fallback.
    pub class_bands: ClassBands,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            poison_enabled: true,
            onset_min_hours: 0.5,
            onset_max_hours: 4.0,
            instant_death_threshold: 20.0,
            learn_per_eat: 0.1,
            forget_on_death: false,
            class_scales: ClassScales {
                mild: OnsetScale {
                    multiplier: 1.5,
                    add_hours: 0.0,
                },
                strong: OnsetScale {
                    multiplier: 1.0,
                    add_hours: 0.0,
                },
                lethal: OnsetScale {
                    multiplier: 0.5,
                    add_hours: 0.0,
                },
            },
            class_bands: ClassBands::default(),
        }
    }
}

impl CoreConfig {
    /// Onset adjustment for a class.
    pub const fn scale(&self, class: PoisonClass) -> OnsetScale {
        match class {
            PoisonClass::Mild => self.class_scales.mild,
            PoisonClass::Strong => self.class_scales.strong,
            PoisonClass::Lethal => self.class_scales.lethal,
        }
    }

    /// Class-scaled onset range in hours.
    pub fn onset_range(&self, class: PoisonClass) -> (f64, f64) {
        let scale = self.scale(class);
        (
            self.onset_min_hours * scale.multiplier + scale.add_hours,
            self.onset_max_hours * scale.multiplier + scale.add_hours,
        )
    }

    /// Classify a poison by its raw damage when no explicit class is known.
    pub fn classify_damage(&self, damage: f64) -> PoisonClass {
        if damage <= self.class_bands.mild_max_damage {
            PoisonClass::Mild
        } else if damage <= self.class_bands.strong_max_damage {
            PoisonClass::Strong
        } else {
            PoisonClass::Lethal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_sane() {
        let config = CoreConfig::default();
        assert!(config.poison_enabled);
        assert!(config.onset_min_hours <= config.onset_max_hours);
        assert!(config.instant_death_threshold > 0.0);
        assert!(config.learn_per_eat > 0.0);
    }

    #[test]
    fn test_onset_range_scaling() {
        let config = CoreConfig::default();
        let (mild_min, mild_max) = config.onset_range(PoisonClass::Mild);
        let (lethal_min, lethal_max) = config.onset_range(PoisonClass::Lethal);

        // Lethal poisons set in faster than mild ones.
        assert!(lethal_min < mild_min);
        assert!(lethal_max < mild_max);
    }

    #[test]
    fn test_classify_damage_bands() {
        let config = CoreConfig::default();
        assert_eq!(config.classify_damage(0.5), PoisonClass::Mild);
        assert_eq!(config.classify_damage(2.0), PoisonClass::Mild);
        assert_eq!(config.classify_damage(4.0), PoisonClass::Strong);
        assert_eq!(config.classify_damage(12.0), PoisonClass::Lethal);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: CoreConfig =
            serde_json::from_str(r#"{"poisonEnabled": false, "instantDeathThreshold": 0.0}"#)
                .unwrap();
        assert!(!config.poison_enabled);
        assert_eq!(config.instant_death_threshold, 0.0);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.learn_per_eat, CoreConfig::default().learn_per_eat);
    }
}
