//! Extended-precision coordinate arithmetic
//!
//! Board coordinates are stored as `i32` ("native") but every sum that can
//! leave the native range (`origin + size`, differences) is carried out in
//! `i64` ("extended") and narrowed back only at the boundary. Products of two
//! extended values (squared norms and distances, dot and cross products) use
//! `i128`: a gap between two native coordinates reaches 2^32 and its square
//! does not fit in `i64`.

/// Native coordinate type stored by every shape
pub type Coord = i32;

/// Wider type used for sums and differences of native coordinates
pub type ExtCoord = i64;

/// Type of products of extended values
pub type SquaredCoord = i128;

/// Promote a native coordinate without loss
#[inline]
pub fn widen(v: Coord) -> ExtCoord {
    ExtCoord::from(v)
}

/// Narrow an extended value back to the native type.
///
/// # Panics
/// Panics when `v` does not fit in the native range. An out-of-range board
/// coordinate is a programming error and never silently wraps or clamps.
#[inline]
#[track_caller]
pub fn narrow(v: ExtCoord) -> Coord {
    match try_narrow(v) {
        Some(c) => c,
        None => panic!("coordinate overflow: {v} does not fit in a native coordinate"),
    }
}

/// Narrow an extended value, returning `None` when it is out of range
#[inline]
pub fn try_narrow(v: ExtCoord) -> Option<Coord> {
    Coord::try_from(v).ok()
}

/// Round a floating point value to the nearest native coordinate.
///
/// # Panics
/// Panics when the rounded value is not representable (including NaN).
#[inline]
#[track_caller]
pub fn round_to_coord(v: f64) -> Coord {
    let r = v.round();
    if r.is_nan() || r < Coord::MIN as f64 || r > Coord::MAX as f64 {
        panic!("coordinate overflow: {v} does not fit in a native coordinate");
    }
    r as Coord
}

/// Square of an extended value, exact for every input
#[inline]
pub fn square(v: ExtCoord) -> SquaredCoord {
    SquaredCoord::from(v) * SquaredCoord::from(v)
}
