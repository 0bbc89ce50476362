use std::f32::consts::TAU;

use glam::Vec3;

use crate::geometry::FlagVertex;

/// Traveling sine wave rippling the flag away from its hoist edge.
pub struct Wave {
    pub amplitude: f32,
    pub wavelength: f32,
    pub speed: f32,
}

impl Default for Wave {
    fn default() -> Self {
        Self {
            amplitude: 0.05,
            wavelength: 0.7,
            speed: 1.2,
        }
    }
}

impl Wave {
    /// Fills `out` with the rest-state vertices displaced to time `t`.
    ///
    /// Positions move along z only; normals are recomputed from the analytic
    /// slope of the displaced surface. Texture coordinates, vertex count,
    /// and layout are untouched, so the result can be re-uploaded over the
    /// mesh created from `base`. The displacement is scaled by the distance
    /// from the hoist edge (x = 0), which stays pinned to the pole.
    pub fn displace(&self, t: f32, base: &[FlagVertex], out: &mut Vec<FlagVertex>) {
        out.clear();
        out.extend_from_slice(base);

        let k = TAU / self.wavelength;
        let omega = self.speed * k;

        for vertex in out.iter_mut() {
            let x = vertex.position[0];
            let y = vertex.position[1];
            let phase = k * (x + 0.5 * y) - omega * t;

            vertex.position[2] = self.amplitude * x * phase.sin();

            let dz_dx = self.amplitude * (phase.sin() + x * k * phase.cos());
            let dz_dy = self.amplitude * x * 0.5 * k * phase.cos();
            let normal = Vec3::new(dz_dx, dz_dy, -1.0).normalize();
            vertex.normal = [normal.x, normal.y, normal.z, 0.0];
        }
    }
}
