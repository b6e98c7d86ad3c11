//! 2D vector path boolean operations over cubic bézier paths.
//!
//! # Crates
//!
//! * **vellum_geom** - f64 cubic bézier and line segment math, including
//!   the fat-line clipping intersection kernel.
//! * **vellum_path** - The segment-based path model: `Path`,
//!   `CompoundPath`, winding and containment, shape constructors.
//! * **vellum_algorithms** - Bounds collisions, path intersections,
//!   crossing resolution and the boolean operations.
//! * **vellum_extra** - SVG path-data reading and writing (behind the
//!   `svg` feature).
//!
//! This meta-crate (`vellum`) mostly reexports the other vellum crates for
//! convenience.
//!
//! # Example
//!
//! ```
//! use vellum::algorithms::{unite, BooleanOptions};
//! use vellum::math::rect;
//! use vellum::path::{Path, PathItem};
//!
//! let a = PathItem::Path(Path::rectangle(rect(0.0, 0.0, 100.0, 100.0)));
//! let b = PathItem::Path(Path::rectangle(rect(50.0, 50.0, 100.0, 100.0)));
//! let union = unite(&a, &b, &BooleanOptions::default());
//! assert!(union.area() > a.area());
//! ```

pub extern crate vellum_algorithms as algorithms;
#[cfg(feature = "svg")]
pub extern crate vellum_extra as extra;

pub use crate::algorithms::geom;
pub use crate::algorithms::math;
pub use crate::algorithms::path;

#[doc(inline)]
pub use crate::algorithms::{
    divide, exclude, intersect, resolve_crossings, subtract, unite, BooleanOps, BooleanOptions,
};
#[doc(inline)]
pub use crate::path::{CompoundPath, FillRule, Path, PathItem, Segment};
