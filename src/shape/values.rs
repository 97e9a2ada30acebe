//! Concrete value types backing each [`ValueShape`](super::ValueShape)
//!
//! Field contents are never read by the sweeps; only the layout matters.

use std::sync::atomic::{AtomicUsize, Ordering};

static SIDE_EFFECTS: AtomicUsize = AtomicUsize::new(0);

/// Number of `EmptyWithSideEffect` values constructed so far in this process.
pub fn side_effect_count() -> usize {
    SIDE_EFFECTS.load(Ordering::Relaxed)
}

/// Value with no fields.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Empty;

/// Value with no fields whose constructor does observable work.
#[derive(Debug, PartialEq)]
pub struct EmptyWithSideEffect;

impl EmptyWithSideEffect {
    /// Construct, bumping the process-wide construction counter.
    pub fn new() -> Self {
        SIDE_EFFECTS.fetch_add(1, Ordering::Relaxed);
        Self
    }
}

#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OneInt {
    pub a: i32,
}

#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TwoInts {
    pub a: i32,
    pub b: i32,
}

#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FourInts {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
}

#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FourLongs {
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: i64,
}

#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FourFloats {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

/// Mixed-width aggregate ("complex" value).
#[allow(missing_docs)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Composite {
    pub id: i64,
    pub ratio: f64,
    pub count: i32,
    pub flags: u8,
    pub weight: f32,
    pub tag: Option<Box<Empty>>,
}

/// Nested value types laid out in place, without indirection.
#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Inline {
    pub head: TwoInts,
    pub body: FourLongs,
    pub tail: FourFloats,
}

/// Extends the [`FourInts`] field set with fields of its own.
#[allow(missing_docs)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Derived {
    pub base: FourInts,
    pub e: i32,
    pub f: i64,
}
