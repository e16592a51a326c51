//! Geometry evaluation for mesh entities.
//!
//! This module provides affine simplex maps built from corner positions.
//! The topology never stores geometry beyond per-element caches.

pub mod metrics;

pub use metrics::{
    LocalPosition, LocalSegmentGeometry, LocalTriangleGeometry, Position, SegmentGeometry,
    TriangleGeometry,
};
