//! Affine simplex geometries evaluated from corner positions.
//!
//! The reference elements use the following vertex ordering:
//! - Segment: `[v0, v1]` with `xi in [0, 1]`.
//! - Triangle: `[v0, v1, v2]` with `(r, s)` in the unit right triangle.
//!
//! All geometries are pure functions of their corner positions; the mesh
//! keeps no state for them beyond the per-element cache it chooses to fill.

use crate::mesh_error::MeshError;

const EPS: f64 = 1e-12;

/// A point in the 3-D ambient space.
pub type Position = [f64; 3];

/// A point in the reference triangle.
pub type LocalPosition = [f64; 2];

/// Affine map from the reference triangle into ambient space.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleGeometry {
    corners: [Position; 3],
}

impl TriangleGeometry {
    /// Build from the three corner positions in reference order.
    pub fn new(corners: [Position; 3]) -> Self {
        Self { corners }
    }

    /// Corner positions.
    #[inline]
    pub fn corners(&self) -> &[Position; 3] {
        &self.corners
    }

    /// Corner `i`.
    #[inline]
    pub fn corner(&self, i: usize) -> Position {
        self.corners[i]
    }

    /// Map reference coordinates `(r, s)` to ambient space.
    pub fn global(&self, local: LocalPosition) -> Position {
        let [c0, c1, c2] = self.corners;
        let [r, s] = local;
        let w0 = 1.0 - r - s;
        [
            w0 * c0[0] + r * c1[0] + s * c2[0],
            w0 * c0[1] + r * c1[1] + s * c2[1],
            w0 * c0[2] + r * c1[2] + s * c2[2],
        ]
    }

    /// Transposed Jacobian: row `i` is the derivative along reference axis `i`.
    pub fn jacobian_transposed(&self) -> [Position; 2] {
        [
            sub(self.corners[1], self.corners[0]),
            sub(self.corners[2], self.corners[0]),
        ]
    }

    /// `sqrt(det(J^T J))`, i.e. twice the triangle area.
    pub fn integration_element(&self) -> f64 {
        let [a, b] = self.jacobian_transposed();
        norm(cross(a, b))
    }

    /// Triangle area.
    pub fn volume(&self) -> f64 {
        0.5 * self.integration_element()
    }

    /// Centroid.
    pub fn center(&self) -> Position {
        self.global([1.0 / 3.0, 1.0 / 3.0])
    }

    /// Unit normal following the corner orientation (right-hand rule).
    pub fn unit_normal(&self) -> Result<Position, MeshError> {
        let [a, b] = self.jacobian_transposed();
        normalized(cross(a, b)).ok_or_else(|| {
            MeshError::InvalidGeometry("degenerate triangle has no normal".into())
        })
    }

    /// Reference coordinates of an ambient point.
    ///
    /// Points off the triangle's plane are projected onto it (least squares
    /// on the normal equations `J^T J xi = J^T (x - c0)`).
    pub fn local(&self, global: Position) -> Result<LocalPosition, MeshError> {
        let [c0, c1] = self.jacobian_transposed();
        let a = dot(c0, c0);
        let b = dot(c0, c1);
        let c = dot(c1, c1);
        let det = a * c - b * b;
        if det.abs() <= EPS * a.max(c).max(1.0) {
            return Err(MeshError::InvalidGeometry("degenerate jacobian".into()));
        }
        let rhs = sub(global, self.corners[0]);
        let rhs0 = dot(c0, rhs);
        let rhs1 = dot(c1, rhs);
        let inv_det = 1.0 / det;
        Ok([
            (c * rhs0 - b * rhs1) * inv_det,
            (-b * rhs0 + a * rhs1) * inv_det,
        ])
    }

    /// Unit normal to local edge `edge`, tangent to the triangle and pointing
    /// away from the opposite corner.
    pub fn outer_normal(&self, edge: usize) -> Result<Position, MeshError> {
        let (i, j) = crate::topology::cell_type::TRIANGLE_EDGE_CORNERS
            .get(edge)
            .copied()
            .ok_or(MeshError::SubEntityOutOfRange {
                codim: 1,
                index: edge,
                count: 3,
            })?;
        let opposite = 3 - i - j;
        segment_outer_normal(
            [self.corners[i], self.corners[j]],
            self.corners[opposite],
            self.unit_normal()?,
        )
    }
}

/// Unit normal to a segment lying in a triangle's plane, pointing away from
/// `interior` (any point on the inner side).
pub fn segment_outer_normal(
    segment: [Position; 2],
    interior: Position,
    plane_normal: Position,
) -> Result<Position, MeshError> {
    let tangent = sub(segment[1], segment[0]);
    let mut n = normalized(cross(tangent, plane_normal))
        .ok_or_else(|| MeshError::InvalidGeometry("degenerate segment".into()))?;
    if dot(n, sub(interior, segment[0])) > 0.0 {
        n = scale(n, -1.0);
    }
    Ok(n)
}

/// Affine map from `[0, 1]` into ambient space.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    corners: [Position; 2],
}

impl SegmentGeometry {
    /// Build from the two endpoint positions.
    pub fn new(corners: [Position; 2]) -> Self {
        Self { corners }
    }

    /// Endpoint positions.
    #[inline]
    pub fn corners(&self) -> &[Position; 2] {
        &self.corners
    }

    /// Map `xi` to ambient space.
    pub fn global(&self, xi: f64) -> Position {
        let [a, b] = self.corners;
        [
            a[0] + xi * (b[0] - a[0]),
            a[1] + xi * (b[1] - a[1]),
            a[2] + xi * (b[2] - a[2]),
        ]
    }

    /// Segment length (constant Jacobian norm).
    pub fn integration_element(&self) -> f64 {
        norm(sub(self.corners[1], self.corners[0]))
    }

    /// Same as [`Self::integration_element`].
    pub fn volume(&self) -> f64 {
        self.integration_element()
    }

    /// Midpoint.
    pub fn center(&self) -> Position {
        self.global(0.5)
    }
}

/// Affine map from `[0, 1]` into the reference triangle of an element.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalSegmentGeometry {
    corners: [LocalPosition; 2],
}

impl LocalSegmentGeometry {
    /// Build from two reference-triangle points.
    pub fn new(corners: [LocalPosition; 2]) -> Self {
        Self { corners }
    }

    /// Endpoints in reference coordinates.
    #[inline]
    pub fn corners(&self) -> &[LocalPosition; 2] {
        &self.corners
    }

    /// Map `xi` into the reference triangle.
    pub fn global(&self, xi: f64) -> LocalPosition {
        let [a, b] = self.corners;
        [a[0] + xi * (b[0] - a[0]), a[1] + xi * (b[1] - a[1])]
    }
}

/// Affine map from the reference triangle into the reference triangle of the
/// parent element.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTriangleGeometry {
    corners: [LocalPosition; 3],
}

impl LocalTriangleGeometry {
    /// Build from three reference-triangle points.
    pub fn new(corners: [LocalPosition; 3]) -> Self {
        Self { corners }
    }

    /// Corners in parent reference coordinates.
    #[inline]
    pub fn corners(&self) -> &[LocalPosition; 3] {
        &self.corners
    }

    /// Map child reference coordinates to parent reference coordinates.
    pub fn global(&self, local: LocalPosition) -> LocalPosition {
        let [c0, c1, c2] = self.corners;
        let [r, s] = local;
        let w0 = 1.0 - r - s;
        [
            w0 * c0[0] + r * c1[0] + s * c2[0],
            w0 * c0[1] + r * c1[1] + s * c2[1],
        ]
    }

    /// Ratio of child to parent area in reference coordinates.
    pub fn integration_element(&self) -> f64 {
        let [c0, c1, c2] = self.corners;
        let a = [c1[0] - c0[0], c1[1] - c0[1]];
        let b = [c2[0] - c0[0], c2[1] - c0[1]];
        (a[0] * b[1] - a[1] * b[0]).abs()
    }
}

/// Arithmetic mean of two positions.
pub fn midpoint(a: Position, b: Position) -> Position {
    [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
    ]
}

pub(crate) fn sub(a: Position, b: Position) -> Position {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn dot(a: Position, b: Position) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: Position, b: Position) -> Position {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn norm(a: Position) -> f64 {
    dot(a, a).sqrt()
}

pub(crate) fn scale(a: Position, factor: f64) -> Position {
    [a[0] * factor, a[1] * factor, a[2] * factor]
}

fn normalized(a: Position) -> Option<Position> {
    let len = norm(a);
    if len <= EPS {
        None
    } else {
        Some(scale(a, 1.0 / len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn approx3(a: Position, b: Position) -> bool {
        approx(a[0], b[0]) && approx(a[1], b[1]) && approx(a[2], b[2])
    }

    fn unit_triangle() -> TriangleGeometry {
        TriangleGeometry::new([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    #[test]
    fn triangle_map_and_area() {
        let g = unit_triangle();
        assert!(approx3(g.global([0.5, 0.5]), [0.5, 0.5, 0.0]));
        assert!(approx(g.volume(), 0.5));
        assert!(approx3(g.unit_normal().unwrap(), [0.0, 0.0, 1.0]));
        assert!(approx3(g.center(), [1.0 / 3.0, 1.0 / 3.0, 0.0]));
    }

    #[test]
    fn local_inverts_global_on_tilted_triangle() {
        let g = TriangleGeometry::new([[0.0, 0.0, 0.0], [2.0, 0.0, 1.0], [0.0, 3.0, 1.0]]);
        let x = g.global([0.2, 0.3]);
        let xi = g.local(x).unwrap();
        assert!(approx(xi[0], 0.2));
        assert!(approx(xi[1], 0.3));
    }

    #[test]
    fn degenerate_triangle_is_reported() {
        let g = TriangleGeometry::new([[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert!(matches!(g.unit_normal(), Err(MeshError::InvalidGeometry(_))));
        assert!(matches!(g.local([0.0; 3]), Err(MeshError::InvalidGeometry(_))));
    }

    #[test]
    fn outer_normals_point_away() {
        let g = unit_triangle();
        // edge 0: corners (0,1) on y = 0
        assert!(approx3(g.outer_normal(0).unwrap(), [0.0, -1.0, 0.0]));
        // edge 1: corners (0,2) on x = 0
        assert!(approx3(g.outer_normal(1).unwrap(), [-1.0, 0.0, 0.0]));
        let s = 1.0 / 2f64.sqrt();
        assert!(approx3(g.outer_normal(2).unwrap(), [s, s, 0.0]));
        assert!(g.outer_normal(3).is_err());
    }

    #[test]
    fn segment_and_local_maps() {
        let s = SegmentGeometry::new([[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        assert!(approx(s.volume(), 5.0));
        assert!(approx3(s.center(), [1.5, 2.0, 0.0]));

        let l = LocalSegmentGeometry::new([[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(l.global(0.5), [0.5, 0.5]);

        let t = LocalTriangleGeometry::new([[0.0, 0.0], [0.5, 0.0], [0.0, 0.5]]);
        assert!(approx(t.integration_element(), 0.25));
        assert_eq!(t.global([1.0, 0.0]), [0.5, 0.0]);
    }
}
