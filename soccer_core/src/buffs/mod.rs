//! Buff catalog: open set of buff identities, each bound to a closed mechanic.

mod catalog;
mod state;

pub use state::*;

use std::collections::HashMap;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{CoreError, GameRng, Params};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Attack,
    Defense,
    Utility,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Attack, Category::Defense, Category::Utility];
}

/// What a buff actually does. Catalog entries point at one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mechanic {
    // Whole-team effects
    SpeedAdvantage,
    SlowGame,
    TeamGiants,
    ShrinkOpponent,
    GiantGoalie,
    ShrinkGoalie,
    BlindGoalie,
    InvertGoalie,
    ReverseMagnet,
    MagneticBall,
    GoalShrink,
    GoalShield,
    GhostHand,
    GoalieInstinct,
    AreaEarthquake,
    // Effects on the picking body
    GhostDribble,
    RepulsorField,
    Veteran,
    TeleportDribble,
    // Effects on a random opposing outfielder
    Confuse,
    Freeze,
    // Charged shots, fired on the holder's next touch
    Fireball,
    Homing,
    Bulldozer,
    Tiger,
    FireHurricane,
    CurveShot,
    Cannonball,
    Comet,
    ImpactBomb,
    PhantomShot,
    Drill,
    TwoStage,
    LeadBall,
    // Resolved on pickup
    SwapPlayer,
    PushLine,
    PureEnergy,
    DeadZone,
    SlipperyGel,
}

/// Who an active buff applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Team,
    Picker,
    OpposingPlayer,
    Instant,
}

impl Mechanic {
    pub fn scope(self) -> Scope {
        use Mechanic::*;
        match self {
            GhostDribble | RepulsorField | Veteran | TeleportDribble => Scope::Picker,
            m if m.is_charged_shot() => Scope::Picker,
            Confuse | Freeze => Scope::OpposingPlayer,
            SwapPlayer | PushLine | PureEnergy | DeadZone | SlipperyGel => Scope::Instant,
            _ => Scope::Team,
        }
    }

    pub fn is_charged_shot(self) -> bool {
        use Mechanic::*;
        matches!(
            self,
            Fireball
                | Homing
                | Bulldozer
                | Tiger
                | FireHurricane
                | CurveShot
                | Cannonball
                | Comet
                | ImpactBomb
                | PhantomShot
                | Drill
                | TwoStage
                | LeadBall
        )
    }

    /// Ball speed on firing, in multiples of max player speed
    pub fn shot_speed_factor(self) -> Option<f32> {
        match self {
            Mechanic::Fireball => Some(2.0),
            Mechanic::Homing => Some(1.5),
            Mechanic::Tiger => Some(3.0),
            Mechanic::FireHurricane => Some(2.5),
            Mechanic::Comet => Some(4.0),
            Mechanic::Cannonball => Some(1.2),
            _ => None,
        }
    }

    /// Ball mass multiplier while this effect is in flight
    pub fn ball_mass_factor(self) -> Option<f32> {
        match self {
            Mechanic::Cannonball => Some(10.0),
            Mechanic::LeadBall => Some(25.0),
            _ => None,
        }
    }

    /// Effects that hurt the side they are aimed at
    pub fn is_hostile(self) -> bool {
        use Mechanic::*;
        matches!(
            self,
            SlowGame | ShrinkOpponent | ShrinkGoalie | BlindGoalie | InvertGoalie | ReverseMagnet | GoalShrink | Confuse | Freeze
        )
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffDef {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub symbol: String,
    /// Frames the effect stays active once picked up
    pub duration: f32,
    pub category: Category,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub unique: bool,
    /// Key of an existing buff whose mechanic this one reuses
    #[serde(default)]
    pub effect_template: Option<String>,
    #[serde(default)]
    pub mechanic: Option<Mechanic>,
}

/// Every buff the match can draw from, with mechanics resolved
#[derive(Debug, Clone, Default)]
pub struct BuffCatalog {
    defs: Vec<(BuffDef, Mechanic)>,
    index: HashMap<String, usize>,
}

impl BuffCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in set of buffs
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for def in catalog::builtin_defs() {
            if let Err(err) = catalog.insert(def) {
                log::warn!("skipping built-in buff: {err}");
            }
        }
        catalog
    }

    /// Add a definition, resolving its mechanic through `effect_template`
    pub fn insert(&mut self, def: BuffDef) -> Result<Mechanic, CoreError> {
        if self.index.contains_key(&def.key) {
            return Err(CoreError::DuplicateBuff(def.key));
        }
        let mechanic = match (&def.effect_template, def.mechanic) {
            (Some(template), _) => self.mechanic(template).ok_or_else(|| CoreError::UnknownTemplate {
                key: def.key.clone(),
                template: template.clone(),
            })?,
            (None, Some(mechanic)) => mechanic,
            (None, None) => return Err(CoreError::MissingMechanic(def.key)),
        };
        self.index.insert(def.key.clone(), self.defs.len());
        self.defs.push((def, mechanic));
        Ok(mechanic)
    }

    /// Add user-authored buffs from a JSON array; returns how many were added
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let defs: Vec<BuffDef> = serde_json::from_str(json)?;
        let count = defs.len();
        for def in defs {
            self.insert(def)?;
        }
        Ok(count)
    }

    pub fn get(&self, key: &str) -> Option<&BuffDef> {
        self.index.get(key).map(|&i| &self.defs[i].0)
    }

    pub fn mechanic(&self, key: &str) -> Option<Mechanic> {
        self.index.get(key).map(|&i| self.defs[i].1)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BuffDef, Mechanic)> {
        self.defs.iter().map(|(def, mechanic)| (def, *mechanic))
    }

    /// Draw the match pool: a few random buffs from each category
    pub fn draw_pool(&self, rng: &mut GameRng) -> Vec<String> {
        let mut pool = Vec::new();
        for category in Category::ALL {
            let keys: Vec<&str> = self
                .defs
                .iter()
                .filter(|(def, _)| def.category == category)
                .map(|(def, _)| def.key.as_str())
                .collect();
            pool.extend(
                keys.choose_multiple(&mut rng.0, Params::BUFFS_PER_CATEGORY)
                    .map(|key| key.to_string()),
            );
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(key: &str, template: Option<&str>) -> BuffDef {
        BuffDef {
            key: key.to_string(),
            name: key.to_string(),
            description: String::new(),
            color: "#ffffff".to_string(),
            symbol: "?".to_string(),
            duration: 600.0,
            category: Category::Attack,
            permanent: false,
            unique: false,
            effect_template: template.map(str::to_string),
            mechanic: None,
        }
    }

    #[test]
    fn test_builtin_catalog_complete() {
        let catalog = BuffCatalog::builtin();
        assert_eq!(catalog.len(), 39);
        assert_eq!(catalog.mechanic("BOLA_DE_CANHAO"), Some(Mechanic::Cannonball));
        assert!(catalog.get("JOGADOR_CASCUDO").is_some_and(|d| d.permanent));
        assert!(catalog.get("MAO_FANTASMA").is_some_and(|d| d.unique));
    }

    #[test]
    fn test_effect_template_reuses_mechanic() {
        let mut catalog = BuffCatalog::builtin();
        let mechanic = catalog
            .insert(custom("MEGA_CHUTE", Some("CHUTE_COMETA")))
            .expect("template exists");
        assert_eq!(mechanic, Mechanic::Comet);
        assert_eq!(catalog.mechanic("MEGA_CHUTE"), Some(Mechanic::Comet));
        assert_eq!(catalog.get("MEGA_CHUTE").map(|d| d.name.as_str()), Some("MEGA_CHUTE"));
    }

    #[test]
    fn test_unknown_template_rejected() {
        let mut catalog = BuffCatalog::builtin();
        let err = catalog.insert(custom("BROKEN", Some("NOPE"))).unwrap_err();
        assert!(matches!(err, CoreError::UnknownTemplate { .. }));
        assert!(catalog.get("BROKEN").is_none());
    }

    #[test]
    fn test_duplicate_and_missing_mechanic_rejected() {
        let mut catalog = BuffCatalog::builtin();
        assert!(matches!(
            catalog.insert(custom("FIREBALL_SHOT", Some("CHUTE_COMETA"))),
            Err(CoreError::DuplicateBuff(_))
        ));
        assert!(matches!(catalog.insert(custom("BARE", None)), Err(CoreError::MissingMechanic(_))));
    }

    #[test]
    fn test_extend_from_json() {
        let mut catalog = BuffCatalog::builtin();
        let json = r##"[{"key": "TURBO", "name": "Turbo", "color": "#00ff00", "symbol": "T",
            "duration": 300, "category": "utility", "effectTemplate": "SPEED_ADVANTAGE"},
            {"key": "ICE", "name": "Ice", "color": "#00ffff", "symbol": "I",
            "duration": 300, "category": "defense", "mechanic": "FREEZE"}]"##;
        assert_eq!(catalog.extend_from_json(json).expect("valid json"), 2);
        assert_eq!(catalog.mechanic("TURBO"), Some(Mechanic::SpeedAdvantage));
        assert_eq!(catalog.mechanic("ICE"), Some(Mechanic::Freeze));
    }

    #[test]
    fn test_draw_pool_two_per_category() {
        let catalog = BuffCatalog::builtin();
        let mut rng = GameRng::new(3);
        let pool = catalog.draw_pool(&mut rng);
        assert_eq!(pool.len(), 6);
        for category in Category::ALL {
            let n = pool
                .iter()
                .filter(|k| catalog.get(k).is_some_and(|d| d.category == category))
                .count();
            assert_eq!(n, 2, "{:?}", category);
        }
    }

    #[test]
    fn test_mechanic_scopes() {
        assert_eq!(Mechanic::Cannonball.scope(), Scope::Picker);
        assert_eq!(Mechanic::Confuse.scope(), Scope::OpposingPlayer);
        assert_eq!(Mechanic::SwapPlayer.scope(), Scope::Instant);
        assert_eq!(Mechanic::GoalShield.scope(), Scope::Team);
        assert_eq!(Mechanic::Cannonball.ball_mass_factor(), Some(10.0));
    }
}
