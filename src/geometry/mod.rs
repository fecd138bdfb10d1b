//! 2D geometry core: native-coordinate primitives and pairwise queries
//!
//! Everything here is pure computation over value types and is safe to call
//! from any number of threads at once.
//!
//! # Submodules
//! - `extended` - Native/extended coordinate types and checked narrowing
//! - `vector` - Integer and floating point vectors, angle helpers
//! - `box2` - Axis-aligned bounding box
//! - `seg` - Zero-width segment helper
//! - `circle` - Idealized circle intersections
//! - `arc` - Three-point circular arc
//! - `tessellation` - Arc approximation math
//! - `shapes` - The closed `Shape` sum type and its concrete kinds
//! - `nearest` - Nearest-points double dispatch
//! - `collide` - Clearance collision test

pub mod extended;
pub mod vector;
pub mod box2;
pub mod seg;
pub mod circle;
pub mod arc;
pub mod tessellation;
pub mod shapes;
pub mod nearest;
pub mod collide;

pub use extended::{narrow, round_to_coord, square, try_narrow, widen, Coord, ExtCoord, SquaredCoord};
pub use vector::{Vector2D, Vector2I};
pub use box2::Box2I;
pub use seg::Seg;
pub use circle::Circle;
pub use arc::{FlipDirection, ShapeArc};
pub use shapes::{
    Polygon, Shape, ShapeCircle, ShapeCompound, ShapeKind, ShapeLineChain, ShapePolySet, ShapeRect,
    ShapeSegment,
};
pub use nearest::{nearest_points, NearestPair};
pub use collide::{collide, Collision};
