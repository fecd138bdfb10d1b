//! Board data consumed by the clearance checker
//!
//! The checker only reads ids, kinds, net codes, layer names, footprint
//! membership and shapes. Connectivity, file formats and everything else
//! about a board stay outside this crate.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{DrcError, DrcResult};
use crate::geometry::{Box2I, Coord, Shape, ShapePolySet};

use super::zones::ZoneSmoothing;

pub type ItemId = u64;

/// Net code; 0 means "not connected"
pub type NetCode = i32;

pub type FootprintId = u32;

/// Copper layer names end in `.Cu` (`F.Cu`, `In1.Cu`, `B.Cu`)
pub fn is_copper_layer(name: &str) -> bool {
    name.len() > 3
        && name
            .get(name.len() - 3..)
            .map_or(false, |suffix| suffix.eq_ignore_ascii_case(".Cu"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Pad,
    Track,
    ArcTrack,
    Via,
    Zone,
    Graphic,
    Text,
}

impl ItemKind {
    /// Tracks, arc tracks and vias
    pub fn is_track(self) -> bool {
        matches!(self, ItemKind::Track | ItemKind::ArcTrack | ItemKind::Via)
    }

    pub fn is_copper_graphic(self) -> bool {
        matches!(self, ItemKind::Graphic | ItemKind::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Pad => "pad",
            ItemKind::Track => "track",
            ItemKind::ArcTrack => "arc track",
            ItemKind::Via => "via",
            ItemKind::Zone => "zone",
            ItemKind::Graphic => "graphic",
            ItemKind::Text => "text",
        }
    }
}

/// A pad, track, via or copper graphic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    pub id: ItemId,
    pub kind: ItemKind,
    #[serde(default)]
    pub net: NetCode,
    pub layers: Vec<String>,
    pub shape: Shape,
    #[serde(default)]
    pub footprint: Option<FootprintId>,
}

/// A copper fill area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ItemId,
    #[serde(default)]
    pub net: NetCode,
    pub layers: Vec<String>,
    pub outline: ShapePolySet,
    #[serde(default)]
    pub smoothing: ZoneSmoothing,
    /// Chamfer distance or fillet radius
    #[serde(default)]
    pub smoothing_radius: Coord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub id: FootprintId,
    #[serde(default)]
    pub reference: String,
    /// Groups of nets allowed to touch inside this footprint
    #[serde(default)]
    pub net_tie_groups: Vec<Vec<NetCode>>,
}

impl Footprint {
    pub fn is_net_tie(&self, a: NetCode, b: NetCode) -> bool {
        self.net_tie_groups
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub footprints: Vec<Footprint>,
    #[serde(default)]
    pub items: Vec<BoardItem>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Board {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reject duplicate item ids and references to missing footprints
    pub fn validate(&self) -> DrcResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len() + self.zones.len());
        let ids = self.items.iter().map(|i| i.id).chain(self.zones.iter().map(|z| z.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(DrcError::DuplicateItemId { id });
            }
        }

        let footprints: HashSet<FootprintId> = self.footprints.iter().map(|f| f.id).collect();
        for item in &self.items {
            if let Some(fp) = item.footprint {
                if !footprints.contains(&fp) {
                    return Err(DrcError::UnknownFootprint { id: item.id, footprint: fp });
                }
            }
        }

        Ok(())
    }

    pub fn footprint(&self, id: FootprintId) -> Option<&Footprint> {
        self.footprints.iter().find(|f| f.id == id)
    }

    pub fn footprint_map(&self) -> HashMap<FootprintId, &Footprint> {
        self.footprints.iter().map(|f| (f.id, f)).collect()
    }

    /// Every copper layer used by some item or zone, sorted
    pub fn copper_layers(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .flat_map(|i| i.layers.iter())
            .chain(self.zones.iter().flat_map(|z| z.layers.iter()))
            .map(String::as_str)
            .filter(|l| is_copper_layer(l))
            .collect()
    }

    pub fn net_codes(&self) -> BTreeSet<NetCode> {
        self.items
            .iter()
            .map(|i| i.net)
            .chain(self.zones.iter().map(|z| z.net))
            .collect()
    }
}

/// Borrowed view of anything the checker tests: board items directly, zones
/// through their smoothed outline.
#[derive(Debug, Clone, Copy)]
pub struct CopperItem<'a> {
    pub id: ItemId,
    pub kind: ItemKind,
    pub net: NetCode,
    pub layers: &'a [String],
    pub footprint: Option<FootprintId>,
    pub shape: &'a Shape,
    pub bbox: Box2I,
}

impl<'a> CopperItem<'a> {
    pub fn from_item(item: &'a BoardItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            net: item.net,
            layers: &item.layers,
            footprint: item.footprint,
            shape: &item.shape,
            bbox: item.shape.bbox(0),
        }
    }

    pub fn from_zone(zone: &'a Zone, outline: &'a Shape) -> Self {
        Self {
            id: zone.id,
            kind: ItemKind::Zone,
            net: zone.net,
            layers: &zone.layers,
            footprint: None,
            shape: outline,
            bbox: outline.bbox(0),
        }
    }

    pub fn is_on_copper(&self) -> bool {
        self.layers.iter().any(|l| is_copper_layer(l))
    }

    /// Copper layers both items are on, in `self`'s order
    pub fn shared_layers<'b>(&'b self, other: &'b CopperItem<'_>) -> impl Iterator<Item = &'b str> + 'b {
        self.layers
            .iter()
            .filter(move |l| is_copper_layer(l) && other.layers.contains(*l))
            .map(String::as_str)
    }
}
