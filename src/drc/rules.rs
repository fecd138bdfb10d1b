//! Clearance rule resolution
//!
//! The checker asks a [`RuleResolver`] for the clearance of each item pair
//! on each layer. [`DesignRules`] is the built-in resolver: net classes plus
//! an ordered list of custom rules where the last match wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DrcError, DrcResult};
use crate::geometry::Coord;

use super::board::{Board, CopperItem, ItemKind, NetCode};

/// Clearance resolved for one pair on one layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClearance {
    pub value: Coord,
    /// Human readable origin of the value, used in violation messages
    pub rule_name: String,
}

pub trait RuleResolver: Sync {
    /// Check that every pair on `board` can be resolved. Runs before any
    /// clearance phase.
    fn validate(&self, board: &Board) -> DrcResult<()>;

    /// Minimum clearance between `a` and `b` on `layer`
    fn resolve(&self, a: &CopperItem<'_>, b: &CopperItem<'_>, layer: &str) -> DrcResult<ResolvedClearance>;

    /// Largest value `resolve` can return; used as the search margin so no
    /// violating pair is rejected by its bounding box
    fn worst_clearance(&self) -> Coord;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetClass {
    pub clearance: Coord,
}

/// Conditions of a custom rule; an absent condition matches anything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Item kinds of the pair, in either order
    #[serde(default)]
    pub kinds: Option<[ItemKind; 2]>,
    /// Net class names of the pair, in either order
    #[serde(default)]
    pub net_classes: Option<[String; 2]>,
    #[serde(default)]
    pub layer: Option<String>,
}

fn pair_matches<T: PartialEq>(pattern: &[T; 2], a: &T, b: &T) -> bool {
    (&pattern[0] == a && &pattern[1] == b) || (&pattern[0] == b && &pattern[1] == a)
}

impl RuleCondition {
    fn matches(&self, kinds: (ItemKind, ItemKind), classes: (Option<&str>, Option<&str>), layer: &str) -> bool {
        if let Some(pattern) = &self.kinds {
            if !pair_matches(pattern, &kinds.0, &kinds.1) {
                return false;
            }
        }

        if let Some([pa, pb]) = &self.net_classes {
            let (Some(ca), Some(cb)) = classes else {
                return false;
            };
            let forward = pa == ca && pb == cb;
            let backward = pa == cb && pb == ca;
            if !forward && !backward {
                return false;
            }
        }

        self.layer.as_deref().map_or(true, |l| l == layer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceRule {
    pub name: String,
    pub clearance: Coord,
    #[serde(default)]
    pub condition: RuleCondition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignRules {
    /// Fallback for items whose net has no class; `None` makes such items a
    /// configuration error
    pub default_clearance: Option<Coord>,
    pub net_classes: IndexMap<String, NetClass>,
    pub net_classes_by_net: IndexMap<NetCode, String>,
    pub rules: Vec<ClearanceRule>,
}

impl Default for DesignRules {
    fn default() -> Self {
        Self {
            default_clearance: Some(200_000), // 0.2 mm
            net_classes: IndexMap::new(),
            net_classes_by_net: IndexMap::new(),
            rules: Vec::new(),
        }
    }
}

impl DesignRules {
    pub fn with_clearance(clearance: Coord) -> Self {
        Self {
            default_clearance: Some(clearance),
            ..Default::default()
        }
    }

    pub fn net_class_of(&self, net: NetCode) -> Option<(&str, &NetClass)> {
        let name = self.net_classes_by_net.get(&net)?;
        self.net_classes.get(name).map(|class| (name.as_str(), class))
    }
}

impl RuleResolver for DesignRules {
    fn validate(&self, board: &Board) -> DrcResult<()> {
        if let Some(value) = self.default_clearance.filter(|v| *v < 0) {
            return Err(DrcError::NegativeClearance { rule: "default".into(), value });
        }
        for (name, class) in &self.net_classes {
            if class.clearance < 0 {
                return Err(DrcError::NegativeClearance {
                    rule: format!("netclass '{name}'"),
                    value: class.clearance,
                });
            }
        }
        for rule in &self.rules {
            if rule.clearance < 0 {
                return Err(DrcError::NegativeClearance {
                    rule: rule.name.clone(),
                    value: rule.clearance,
                });
            }
        }

        for (net, class) in &self.net_classes_by_net {
            if !self.net_classes.contains_key(class) {
                return Err(DrcError::UnknownNetClass {
                    net_code: *net,
                    class: class.clone(),
                });
            }
        }

        if self.default_clearance.is_none() {
            let ids = board
                .items
                .iter()
                .map(|i| (i.id, i.net))
                .chain(board.zones.iter().map(|z| (z.id, z.net)));
            for (id, net) in ids {
                if self.net_class_of(net).is_none() {
                    return Err(DrcError::MissingDefaultClearance { item: id });
                }
            }
        }

        Ok(())
    }

    fn resolve(&self, a: &CopperItem<'_>, b: &CopperItem<'_>, layer: &str) -> DrcResult<ResolvedClearance> {
        let class_a = self.net_class_of(a.net);
        let class_b = self.net_class_of(b.net);
        let names = (class_a.map(|c| c.0), class_b.map(|c| c.0));

        if let Some(rule) = self
            .rules
            .iter()
            .rev()
            .find(|r| r.condition.matches((a.kind, b.kind), names, layer))
        {
            return Ok(ResolvedClearance {
                value: rule.clearance,
                rule_name: format!("rule '{}'", rule.name),
            });
        }

        let from_class = [class_a, class_b]
            .into_iter()
            .flatten()
            .max_by_key(|(_, class)| class.clearance);
        if let Some((name, class)) = from_class {
            return Ok(ResolvedClearance {
                value: class.clearance,
                rule_name: format!("netclass '{name}'"),
            });
        }

        match self.default_clearance {
            Some(value) => Ok(ResolvedClearance {
                value,
                rule_name: "board setup constraints".into(),
            }),
            None => Err(DrcError::MissingDefaultClearance { item: a.id }),
        }
    }

    fn worst_clearance(&self) -> Coord {
        let classes = self.net_classes.values().map(|c| c.clearance);
        let rules = self.rules.iter().map(|r| r.clearance);
        self.default_clearance
            .into_iter()
            .chain(classes)
            .chain(rules)
            .max()
            .unwrap_or(0)
    }
}
