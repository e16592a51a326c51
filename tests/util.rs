#![allow(dead_code)]
use hier_mesh::prelude::*;

/// Unit square split along the (1,0)-(0,1) diagonal:
/// element 0 = [v0, v1, v2], element 1 = [v1, v3, v2].
pub fn two_triangles() -> Mesh {
    MeshBuilder::from_raw(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ],
        &[[0, 1, 2], [1, 3, 2]],
    )
    .unwrap()
}

pub fn el(i: usize) -> ElementId {
    ElementId::from_index(i)
}

pub fn approx(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
}

pub fn approx2(a: [f64; 2], b: [f64; 2]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
}

/// `(index_in_inside, outside)` of every intersection in iteration order.
pub fn summary<'m>(it: impl Iterator<Item = Intersection<'m>>) -> Vec<(usize, Option<ElementId>)> {
    it.map(|is| (is.index_in_inside(), is.outside())).collect()
}

pub fn sorted(mut indices: Vec<usize>) -> Vec<usize> {
    indices.sort_unstable();
    indices
}
