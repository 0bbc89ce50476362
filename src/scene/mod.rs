pub mod camera;
pub mod wave;

pub use camera::Camera;
pub use wave::Wave;

use std::time::Instant;

use winit::keyboard::KeyCode;

use crate::geometry::FlagVertex;

/// CPU-side scene state: the camera and the flag's animated vertex data.
pub struct Scene {
    pub camera: Camera,
    wave: Wave,
    time: f32,
    last_update: Instant,
    base_vertices: Vec<FlagVertex>,
    flag_vertices: Vec<FlagVertex>,
}

impl Scene {
    /// `base_vertices` is the flag's rest-state grid, retained for the
    /// lifetime of the scene as the animation's input.
    pub fn new(camera: Camera, base_vertices: Vec<FlagVertex>) -> Self {
        Self {
            camera,
            wave: Wave::default(),
            time: 0.0,
            last_update: Instant::now(),
            flag_vertices: base_vertices.clone(),
            base_vertices,
        }
    }

    /// Advances the camera and the flag wave by the wall-clock delta. The
    /// displaced vertices are read back through [`Scene::flag_vertices`] and
    /// re-uploaded by the caller before the next draw.
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        self.camera.update(dt);
        self.time += dt;
        self.wave
            .displace(self.time, &self.base_vertices, &mut self.flag_vertices);
    }

    pub fn flag_vertices(&self) -> &[FlagVertex] {
        &self.flag_vertices
    }

    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) {
        self.camera.process_keyboard(key, pressed);
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.camera.process_mouse(dx, dy);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = width as f32 / height as f32;
    }
}
