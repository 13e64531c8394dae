//! Vector math re-exported from [`glam`].
//!
//! ```
//! use strata_core::math::Vec2;
//!
//! let cursor = Vec2::new(10.0, 20.0);
//! let moved = cursor + Vec2::new(1.0, 0.5);
//! assert_eq!(moved, Vec2::new(11.0, 20.5));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::Vec2;
