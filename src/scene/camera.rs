use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

const MOVE_SPEED: f32 = 2.0;
const MOUSE_SENSITIVITY: f32 = 0.25;

/// WASD fly camera. Yaw 90 looks down +Z, toward the wall behind the flag.
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    input: CameraInput,
}

#[derive(Default)]
struct CameraInput {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl Camera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            yaw: 90.0,
            pitch: 0.0,
            fov: 45.0,
            aspect,
            near: 0.1,
            far: 100.0,
            input: CameraInput::default(),
        }
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let projection =
            Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.position, self.position + self.view_direction(), Vec3::Y);
        projection * view
    }

    fn view_direction(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize()
    }

    fn forward(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(yaw_cos, 0.0, yaw_sin)
    }

    pub fn update(&mut self, dt: f32) {
        let velocity = MOVE_SPEED * dt;
        let forward = self.forward();
        let right = forward.cross(Vec3::Y);

        if self.input.forward {
            self.position += forward * velocity;
        }
        if self.input.backward {
            self.position -= forward * velocity;
        }
        if self.input.right {
            self.position += right * velocity;
        }
        if self.input.left {
            self.position -= right * velocity;
        }
        if self.input.up {
            self.position.y += velocity;
        }
        if self.input.down {
            self.position.y -= velocity;
        }
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-89.0, 89.0);
    }

    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.input.forward = pressed,
            KeyCode::KeyS => self.input.backward = pressed,
            KeyCode::KeyA => self.input.left = pressed,
            KeyCode::KeyD => self.input.right = pressed,
            KeyCode::Space => self.input.up = pressed,
            KeyCode::ShiftLeft => self.input.down = pressed,
            _ => {}
        }
    }
}
