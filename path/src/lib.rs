#![deny(bare_trait_objects)]
#![allow(clippy::many_single_char_names)]

//! Segment-based 2D path data structures.
//!
//! This crate is reexported in [vellum](../vellum/index.html).
//!
//! A [`Path`](struct.Path.html) is an ordered list of
//! [`Segment`](struct.Segment.html)s, each an anchor point with two relative
//! handle vectors; consecutive segments span cubic bézier
//! [`Curve`](struct.Curve.html)s. A
//! [`CompoundPath`](struct.CompoundPath.html) holds several paths that fill
//! as one shape, and [`PathItem`](enum.PathItem.html) is either.

pub extern crate vellum_geom as geom;

pub use crate::geom::math;

mod compound;
mod curve;
mod fitter;
mod path;
mod segment;
mod shapes;
mod smooth;
pub mod winding;

#[doc(inline)]
pub use crate::compound::{CompoundPath, PathItem};
#[doc(inline)]
pub use crate::curve::Curve;
#[doc(inline)]
pub use crate::path::Path;
#[doc(inline)]
pub use crate::segment::Segment;
#[doc(inline)]
pub use crate::smooth::{SmoothOptions, SmoothType};
#[doc(inline)]
pub use crate::winding::Winding;

use thiserror::Error;

/// The caller-logic errors of the path mutation API.
///
/// All numerical fallbacks produce well-defined results instead; these are
/// the only conditions under which path construction refuses to proceed.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("Use a move_to command first.")]
    MissingMoveTo,
    #[error("A path can only have one move_to command, at the beginning.")]
    UnexpectedMoveTo,
    #[error("Cannot create an arc with the given arguments.")]
    InvalidArc,
}

/// Determines which regions of a filled path count as inside.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    /// A point is inside when the winding number around it is odd.
    EvenOdd,
    /// A point is inside when the winding number around it is non-zero.
    NonZero,
}

impl FillRule {
    /// The fill predicate over a plain winding number.
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::EvenOdd => winding & 1 == 1,
            FillRule::NonZero => winding != 0,
        }
    }
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::NonZero
    }
}
