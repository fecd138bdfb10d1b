//! PCB geometry and copper clearance checking
//!
//! - [`geometry`] - native-coordinate boxes, arcs and shapes with exact
//!   nearest-point and collision queries
//! - [`drc`] - the copper clearance provider that runs those queries over a
//!   board, pair by pair, under a set of clearance rules
//!
//! Coordinates are `i32` nanometres; products and sums are widened to `i64`.
//!
//! # Example
//! ```
//! use pcb_clearance::drc::{Board, ClearanceProvider, DesignRules, DrcSettings, NoProgress, VecSink};
//!
//! let board = Board::from_json_str(r#"{"items": []}"#).unwrap();
//! let rules = DesignRules::with_clearance(100_000);
//! let settings = DrcSettings::default();
//! let sink = VecSink::new();
//! let summary = ClearanceProvider::new(&board, &rules, &settings)
//!     .run(&sink, &NoProgress)
//!     .unwrap();
//! assert_eq!(summary.reported, 0);
//! ```

pub mod error;
pub mod geometry;
pub mod drc;

pub use error::{DrcError, DrcResult, GeometryError, GeometryResult};
