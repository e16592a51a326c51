//! Cell type metadata and the reference-element table.
//!
//! The surface mesh only knows three shapes, one per codimension:
//! triangles (codim 0), segments (codim 1) and vertices (codim 2).
//!
//! Reference triangle numbering (corners at `(0,0)`, `(1,0)`, `(0,1)`):
//!
//! ```text
//!   2
//!   | \
//!   1   2
//!   |     \
//!   0 --0-- 1
//! ```
//!
//! Edge 0 joins corners (0,1), edge 1 joins (0,2), edge 2 joins (1,2).

/// Topological dimension of the element shape (triangles).
pub const ELEMENT_DIMENSION: usize = 2;

/// Highest valid codimension (vertices).
pub const MAX_CODIM: usize = ELEMENT_DIMENSION;

/// Local corner pairs of the reference triangle's edges.
pub const TRIANGLE_EDGE_CORNERS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Cell shapes present in the mesh.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> usize {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle => 2,
        }
    }

    /// Codimension relative to the triangle elements of the mesh.
    pub fn codimension(self) -> usize {
        ELEMENT_DIMENSION - self.dimension()
    }

    /// The shape living at codimension `codim`, if any.
    pub fn for_codim(codim: usize) -> Option<CellType> {
        match codim {
            0 => Some(CellType::Triangle),
            1 => Some(CellType::Segment),
            2 => Some(CellType::Vertex),
            _ => None,
        }
    }

    /// Number of corners of the reference shape.
    pub fn corner_count(self) -> usize {
        self.dimension() + 1
    }

    /// Number of sub-entities of codimension `codim` (relative to the mesh)
    /// contained in this shape, or `None` if `codim` does not apply.
    pub fn sub_entity_count(self, codim: usize) -> Option<usize> {
        let own = self.codimension();
        if codim < own || codim > MAX_CODIM {
            return None;
        }
        // simplex: number of (d-k)-faces of a d-simplex is C(d+1, d-k+1)
        let sub_dim = ELEMENT_DIMENSION - codim;
        Some(binomial(self.dimension() + 1, sub_dim + 1))
    }

    /// Local corner pair bounding local edge `edge` of this shape.
    ///
    /// Triangles use [`TRIANGLE_EDGE_CORNERS`]; a segment is its own single
    /// edge. Returns `None` for vertices or out-of-range edges.
    pub fn edge_corners(self, edge: usize) -> Option<(usize, usize)> {
        match self {
            CellType::Triangle => TRIANGLE_EDGE_CORNERS.get(edge).copied(),
            CellType::Segment if edge == 0 => Some((0, 1)),
            _ => None,
        }
    }
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_and_codims() {
        assert_eq!(CellType::Triangle.codimension(), 0);
        assert_eq!(CellType::Segment.codimension(), 1);
        assert_eq!(CellType::Vertex.codimension(), 2);
        for codim in 0..=MAX_CODIM {
            let ct = CellType::for_codim(codim).unwrap();
            assert_eq!(ct.codimension(), codim);
        }
        assert_eq!(CellType::for_codim(3), None);
    }

    #[test]
    fn sub_entity_counts() {
        assert_eq!(CellType::Triangle.sub_entity_count(0), Some(1));
        assert_eq!(CellType::Triangle.sub_entity_count(1), Some(3));
        assert_eq!(CellType::Triangle.sub_entity_count(2), Some(3));
        assert_eq!(CellType::Segment.sub_entity_count(0), None);
        assert_eq!(CellType::Segment.sub_entity_count(1), Some(1));
        assert_eq!(CellType::Segment.sub_entity_count(2), Some(2));
        assert_eq!(CellType::Vertex.sub_entity_count(2), Some(1));
        assert_eq!(CellType::Triangle.sub_entity_count(3), None);
    }

    #[test]
    fn reference_edges() {
        assert_eq!(CellType::Triangle.edge_corners(0), Some((0, 1)));
        assert_eq!(CellType::Triangle.edge_corners(1), Some((0, 2)));
        assert_eq!(CellType::Triangle.edge_corners(2), Some((1, 2)));
        assert_eq!(CellType::Triangle.edge_corners(3), None);
        assert_eq!(CellType::Segment.edge_corners(0), Some((0, 1)));
        assert_eq!(CellType::Vertex.edge_corners(0), None);
    }
}
