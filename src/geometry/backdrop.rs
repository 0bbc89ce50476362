use std::f32::consts::TAU;

use super::{FlagVertex, MeshData};

/// Angular resolution of the flagpole's surface of revolution.
pub(crate) const FLAGPOLE_RES: u32 = 16;

// Flagpole profile, top to bottom: the truck (the ball capping the pole)
// tapers through a crown down to the shaft.
pub(crate) const TRUCK_TOP: f32 = 0.5;
pub(crate) const TRUCK_CROWN: f32 = 0.41;
pub(crate) const TRUCK_BOTTOM: f32 = 0.38;
pub(crate) const SHAFT_TOP: f32 = 0.3775;
pub(crate) const SHAFT_BOTTOM: f32 = -2.0;
pub(crate) const TRUCK_CROWN_RADIUS: f32 = 0.020;
pub(crate) const TRUCK_BOTTOM_RADIUS: f32 = 0.015;
pub(crate) const SHAFT_RADIUS: f32 = 0.010;

/// The pole axis sits back from the origin so the shaft's surface touches
/// the flag's hoist edge at x = 0.
pub(crate) const AXIS_XZ: [f32; 2] = [-SHAFT_RADIUS, 0.0];

const GROUND_LO: [f32; 3] = [-2.0, SHAFT_BOTTOM, -3.0];
const GROUND_HI: [f32; 3] = [4.0, SHAFT_BOTTOM, 3.0];
const WALL_LO: [f32; 3] = [GROUND_LO[0], SHAFT_BOTTOM, GROUND_HI[2]];
const WALL_HI: [f32; 3] = [GROUND_HI[0], 1.0, GROUND_HI[2]];

// Regions of the backdrop texture atlas: a vertical flagpole strip on the
// left, then the ground and the wall side by side.
const TEX_FLAGPOLE_LO: [f32; 2] = [0.0, 0.0];
const TEX_FLAGPOLE_HI: [f32; 2] = [0.125, 1.0];
const TEX_GROUND_LO: [f32; 2] = [0.125, 0.03125];
const TEX_GROUND_HI: [f32; 2] = [0.5625, 0.96875];
const TEX_WALL_LO: [f32; 2] = [0.5625, 0.03125];
const TEX_WALL_HI: [f32; 2] = [1.0, 0.96875];

/// Vertices preceding the flagpole rings: four ground, four wall, one apex.
pub(crate) const RING_VERTEX_BASE: u32 = 9;
/// Vertices per ring: crown, crown bottom, shaft top, shaft bottom, and the
/// shaft-bottom duplicate carrying the bottom cap's normal.
pub(crate) const RING_STRIDE: u32 = 5;

/// Index of ring `i`'s first vertex. `i` wraps, so the segment closing the
/// revolution addresses ring 0 again.
pub(crate) fn ring_base(i: u32) -> u16 {
    (RING_VERTEX_BASE + RING_STRIDE * (i % FLAGPOLE_RES)) as u16
}

/// Linear map from a height on the pole profile to the vertical texture
/// coordinate of the atlas's flagpole strip.
fn flagpole_t(y: f32) -> f32 {
    TEX_FLAGPOLE_LO[1]
        + (TEX_FLAGPOLE_HI[1] - TEX_FLAGPOLE_LO[1]) * (y - TRUCK_TOP) / (SHAFT_BOTTOM - TRUCK_TOP)
}

/// Builds the scene backdrop: a ground quad, a wall quad behind the flag,
/// and the flagpole as a surface of revolution closed with a cap at each
/// end. All windings are counter-clockwise as seen from the side their
/// vertex normal points to.
pub fn build_backdrop() -> MeshData {
    let vertex_count = (RING_VERTEX_BASE + RING_STRIDE * FLAGPOLE_RES + 1) as usize;
    let index_count = (6 + 6 + 3 * 8 * FLAGPOLE_RES) as usize;

    let mut vertices = Vec::with_capacity(vertex_count);

    // Ground quad, facing up.
    let ground_y = GROUND_LO[1];
    let up = [0.0, 1.0, 0.0];
    vertices.push(FlagVertex::new(
        [GROUND_LO[0], ground_y, GROUND_LO[2]],
        up,
        [TEX_GROUND_LO[0], TEX_GROUND_LO[1]],
    ));
    vertices.push(FlagVertex::new(
        [GROUND_HI[0], ground_y, GROUND_LO[2]],
        up,
        [TEX_GROUND_HI[0], TEX_GROUND_LO[1]],
    ));
    vertices.push(FlagVertex::new(
        [GROUND_HI[0], ground_y, GROUND_HI[2]],
        up,
        [TEX_GROUND_HI[0], TEX_GROUND_HI[1]],
    ));
    vertices.push(FlagVertex::new(
        [GROUND_LO[0], ground_y, GROUND_HI[2]],
        up,
        [TEX_GROUND_LO[0], TEX_GROUND_HI[1]],
    ));

    // Wall quad along the ground's far edge, facing the camera.
    let wall_z = WALL_LO[2];
    let toward_camera = [0.0, 0.0, -1.0];
    vertices.push(FlagVertex::new(
        [WALL_LO[0], WALL_LO[1], wall_z],
        toward_camera,
        [TEX_WALL_LO[0], TEX_WALL_LO[1]],
    ));
    vertices.push(FlagVertex::new(
        [WALL_HI[0], WALL_LO[1], wall_z],
        toward_camera,
        [TEX_WALL_HI[0], TEX_WALL_LO[1]],
    ));
    vertices.push(FlagVertex::new(
        [WALL_HI[0], WALL_HI[1], wall_z],
        toward_camera,
        [TEX_WALL_HI[0], TEX_WALL_HI[1]],
    ));
    vertices.push(FlagVertex::new(
        [WALL_LO[0], WALL_HI[1], wall_z],
        toward_camera,
        [TEX_WALL_LO[0], TEX_WALL_HI[1]],
    ));

    // Truck apex, the top cap's center.
    vertices.push(FlagVertex::new(
        [AXIS_XZ[0], TRUCK_TOP, AXIS_XZ[1]],
        [0.0, 1.0, 0.0],
        [TEX_FLAGPOLE_LO[0], flagpole_t(TRUCK_TOP)],
    ));

    let theta_step = TAU / FLAGPOLE_RES as f32;
    let s_step = (TEX_FLAGPOLE_HI[0] - TEX_FLAGPOLE_LO[0]) / FLAGPOLE_RES as f32;

    for i in 0..FLAGPOLE_RES {
        let (sin, cos) = (theta_step * i as f32).sin_cos();
        let s = TEX_FLAGPOLE_LO[0] + s_step * i as f32;
        let side_normal = [cos, 0.0, sin];
        let on_ring =
            |radius: f32, y: f32| [AXIS_XZ[0] + radius * cos, y, AXIS_XZ[1] + radius * sin];

        vertices.push(FlagVertex::new(
            on_ring(TRUCK_CROWN_RADIUS, TRUCK_CROWN),
            side_normal,
            [s, flagpole_t(TRUCK_CROWN)],
        ));
        vertices.push(FlagVertex::new(
            on_ring(TRUCK_BOTTOM_RADIUS, TRUCK_BOTTOM),
            side_normal,
            [s, flagpole_t(TRUCK_BOTTOM)],
        ));
        vertices.push(FlagVertex::new(
            on_ring(SHAFT_RADIUS, SHAFT_TOP),
            side_normal,
            [s, flagpole_t(SHAFT_TOP)],
        ));
        vertices.push(FlagVertex::new(
            on_ring(SHAFT_RADIUS, SHAFT_BOTTOM),
            side_normal,
            [s, flagpole_t(SHAFT_BOTTOM)],
        ));
        // Same position again with the cap's normal: the shaft-to-cap crease
        // is sharp, so the two faces must not share an interpolated normal.
        vertices.push(FlagVertex::new(
            on_ring(SHAFT_RADIUS, SHAFT_BOTTOM),
            [0.0, -1.0, 0.0],
            [s, flagpole_t(SHAFT_BOTTOM)],
        ));
    }

    // Bottom cap's center, on the axis.
    let bottom_center = vertices.len() as u16;
    vertices.push(FlagVertex::new(
        [AXIS_XZ[0], SHAFT_BOTTOM, AXIS_XZ[1]],
        [0.0, -1.0, 0.0],
        [TEX_FLAGPOLE_LO[0], flagpole_t(SHAFT_BOTTOM)],
    ));

    let mut indices = Vec::with_capacity(index_count);
    indices.extend_from_slice(&[0, 2, 1, 0, 3, 2]); // ground
    indices.extend_from_slice(&[4, 6, 5, 4, 7, 6]); // wall

    for i in 0..FLAGPOLE_RES {
        let cur = ring_base(i);
        let next = ring_base(i + 1);

        // Top cap fan around the apex.
        indices.extend_from_slice(&[8, next, cur]);

        // Three bands of quads down the profile: crown to crown bottom,
        // crown bottom to shaft top, shaft top to shaft bottom.
        for band in 0..3u16 {
            let (a, b) = (cur + band, next + band);
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }

        // Bottom cap fan, stitched to the duplicate ring.
        indices.extend_from_slice(&[cur + 4, next + 4, bottom_center]);
    }

    MeshData { vertices, indices }
}
