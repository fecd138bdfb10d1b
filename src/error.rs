//! Error types
//!
//! `GeometryError` covers invalid geometric construction input,
//! `DrcError` covers rule/configuration problems found before a clearance run.

use thiserror::Error;

use crate::geometry::Vector2I;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate arc: start {start:?}, mid {mid:?}, end {end:?} do not define a circle")]
    DegenerateArc {
        start: Vector2I,
        mid: Vector2I,
        end: Vector2I,
    },

    #[error("cannot fit a tangent arc between parallel segments")]
    ParallelTangentSegments,

    #[error("cannot fit a tangent arc to a zero-length segment")]
    ZeroLengthSegment,

    #[error("tangent arc radius must be positive, got {radius}")]
    InvalidRadius { radius: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrcError {
    #[error("net {net_code} is assigned to unknown net class `{class}`")]
    UnknownNetClass { net_code: i32, class: String },

    #[error("item {item} has no net class clearance and no default clearance is configured")]
    MissingDefaultClearance { item: u64 },

    #[error("rule `{rule}` has negative clearance {value}")]
    NegativeClearance { rule: String, value: i32 },

    #[error("board item id {id} is used more than once")]
    DuplicateItemId { id: u64 },

    #[error("item {id} references unknown footprint {footprint}")]
    UnknownFootprint { id: u64, footprint: u32 },

    #[error("invalid DRC settings: {reason}")]
    Settings { reason: String },
}

pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
pub type DrcResult<T> = std::result::Result<T, DrcError>;
