//! Structured triangle meshes.

use super::MeshBuilder;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::Mesh;

fn invalid_geometry(message: impl Into<String>) -> MeshError {
    MeshError::InvalidGeometry(message.into())
}

/// Triangulate `[min, max]` in the `z = 0` plane with `nx`×`ny` squares,
/// each split along its diagonal into two counter-clockwise triangles.
///
/// Vertices are numbered row by row, so vertex `j * (nx + 1) + i` sits at
/// grid point `(i, j)`.
pub fn triangle_grid(nx: usize, ny: usize, min: [f64; 2], max: [f64; 2]) -> Result<Mesh, MeshError> {
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    if !(max[0] > min[0] && max[1] > min[1]) {
        return Err(invalid_geometry("max must exceed min in both directions"));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let mut builder = MeshBuilder::new();
    for j in 0..=ny {
        let y = min[1] + dy * j as f64;
        for i in 0..=nx {
            builder.insert_vertex([min[0] + dx * i as f64, y, 0.0])?;
        }
    }

    let row_stride = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * row_stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + row_stride;
            let v2 = v3 + 1;
            builder.insert_element(CellType::Triangle, &[v0, v1, v2])?;
            builder.insert_element(CellType::Triangle, &[v0, v2, v3])?;
        }
    }

    builder.finalize().ok_or(MeshError::BuilderFinalized)
}
