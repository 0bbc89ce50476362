use glam::Vec2;

use super::{FlagVertex, MeshData};

/// Grid resolution and extent of the flag surface.
pub(crate) const FLAG_COLUMNS: u32 = 100;
pub(crate) const FLAG_ROWS: u32 = 75;
pub(crate) const FLAG_LO: Vec2 = Vec2::new(0.0, -0.375);
pub(crate) const FLAG_HI: Vec2 = Vec2::new(1.0, 0.375);

/// Index of the vertex at (row, col) in the row-major grid.
fn grid_index(row: u32, col: u32, columns: u32) -> u16 {
    (row * columns + col) as u16
}

/// Builds a regular `columns` x `rows` grid of quads spanning the rectangle
/// `lo`..`hi` in the z = 0 plane. Each cell is split into two triangles
/// along the same diagonal. Vertices are laid out row-major with the
/// constant normal (0, 0, -1) and texture coordinates interpolated over
/// [0, 1] on both axes.
///
/// The returned vertex vector is the caller's to keep: the flag retains its
/// copy as the rest state its animation displaces and re-uploads each frame.
pub fn build_grid(columns: u32, rows: u32, lo: Vec2, hi: Vec2) -> MeshData {
    assert!(columns >= 2 && rows >= 2, "grid needs at least 2x2 vertices");
    assert!(
        columns * rows <= u16::MAX as u32 + 1,
        "grid exceeds 16-bit index range"
    );

    let step = (hi - lo) / Vec2::new((columns - 1) as f32, (rows - 1) as f32);
    let s_step = 1.0 / (columns - 1) as f32;
    let t_step = 1.0 / (rows - 1) as f32;

    let mut vertices = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        for col in 0..columns {
            vertices.push(FlagVertex::new(
                [lo.x + step.x * col as f32, lo.y + step.y * row as f32, 0.0],
                [0.0, 0.0, -1.0],
                [s_step * col as f32, t_step * row as f32],
            ));
        }
    }

    let mut indices = Vec::with_capacity((6 * (columns - 1) * (rows - 1)) as usize);
    for row in 0..rows - 1 {
        for col in 0..columns - 1 {
            let i = grid_index(row, col, columns);
            let below = i + columns as u16;
            indices.extend_from_slice(&[i, below, i + 1, i + 1, below, below + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// The flag surface at its demo resolution and extent.
pub fn build_flag() -> MeshData {
    build_grid(FLAG_COLUMNS, FLAG_ROWS, FLAG_LO, FLAG_HI)
}
