use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use winit::window::Window;

pub mod geometry;
pub mod renderer;
pub mod scene;

use geometry::{build_backdrop, build_flag, Material, Mesh, MeshUsage, Texture};
use renderer::Renderer;
use scene::{camera::Camera, Scene};

/// Optional texture overrides from the command line; procedural fallbacks
/// are generated when absent.
#[derive(Default)]
pub struct TextureOptions<'a> {
    pub flag: Option<&'a Path>,
    pub backdrop: Option<&'a Path>,
}

pub struct State {
    window: Arc<Window>,
    pub scene: Scene,
    renderer: Renderer<'static>,
    flag_mesh: Mesh,
    flag_material: Material,
    backdrop_mesh: Mesh,
    backdrop_material: Material,
}

impl State {
    pub fn new(window: Window, textures: TextureOptions) -> Result<Self> {
        let window = Arc::new(window);
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Failed to find appropriate adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(device, queue, &config, surface);

        // Build the geometry once; only the flag's vertices change after this.
        let flag_data = build_flag();
        let flag_mesh = Mesh::new(
            renderer.device(),
            "Flag",
            &flag_data.vertices,
            &flag_data.indices,
            MeshUsage::Stream,
        )?;

        let backdrop_data = build_backdrop();
        let backdrop_mesh = Mesh::new(
            renderer.device(),
            "Backdrop",
            &backdrop_data.vertices,
            &backdrop_data.indices,
            MeshUsage::Static,
        )?;

        let flag_texture = match textures.flag {
            Some(path) => Texture::from_path(renderer.device(), renderer.queue(), path, Some("Flag Texture"))
                .with_context(|| format!("Failed to load flag texture {}", path.display()))?,
            None => {
                let size = 256u32;
                Texture::from_pixels(
                    renderer.device(),
                    renderer.queue(),
                    size,
                    size,
                    &create_flag_pixels(size, size),
                    Some("Flag Texture"),
                )?
            }
        };

        let backdrop_texture = match textures.backdrop {
            Some(path) => Texture::from_path(renderer.device(), renderer.queue(), path, Some("Backdrop Texture"))
                .with_context(|| format!("Failed to load backdrop texture {}", path.display()))?,
            None => {
                let size = 512u32;
                Texture::from_pixels(
                    renderer.device(),
                    renderer.queue(),
                    size,
                    size,
                    &create_backdrop_pixels(size, size),
                    Some("Backdrop Texture"),
                )?
            }
        };

        let flag_material = Material::new(
            renderer.device(),
            "Flag",
            flag_texture,
            &renderer.material_bind_group_layout,
        );
        let backdrop_material = Material::new(
            renderer.device(),
            "Backdrop",
            backdrop_texture,
            &renderer.material_bind_group_layout,
        );

        let camera = Camera::new(
            Vec3::new(0.5, -0.2, -2.2),
            size.width.max(1) as f32 / size.height.max(1) as f32,
        );
        let scene = Scene::new(camera, flag_data.vertices);

        Ok(Self {
            window,
            scene,
            renderer,
            flag_mesh,
            flag_material,
            backdrop_mesh,
            backdrop_material,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.renderer
                .resize(winit::dpi::PhysicalSize::new(width, height));
            self.scene.resize(width, height);
        }
    }

    /// Advances the animation and refreshes the flag's vertex buffer. The
    /// wave writes the CPU vertices and the upload reads them back-to-back;
    /// topology never changes.
    pub fn update(&mut self) -> Result<()> {
        self.scene.update();
        self.flag_mesh
            .upload_vertices(self.renderer.queue(), self.scene.flag_vertices())
    }

    pub fn render(&mut self) -> Result<()> {
        self.renderer.render(
            &self.scene.camera,
            &[
                (&self.backdrop_mesh, &self.backdrop_material),
                (&self.flag_mesh, &self.flag_material),
            ],
        )
    }
}

/// Three horizontal bands, a simple tricolor.
fn create_flag_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let color = match y * 3 / height {
            0 => [205u8, 30, 45, 255],
            1 => [245, 245, 245, 255],
            _ => [25, 70, 150, 255],
        };
        for _x in 0..width {
            data.extend_from_slice(&color);
        }
    }
    data
}

/// The backdrop atlas: a metal flagpole strip on the left eighth, grass in
/// the middle, masonry on the right, matching the builder's texture regions.
fn create_backdrop_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / width as f32;
            let color = if u < 0.125 {
                // Brushed metal with a faint vertical streak.
                let streak = ((x % 8) as i32 - 4).unsigned_abs() as u8 * 4;
                [160 + streak, 165 + streak, 175 + streak, 255]
            } else if u < 0.5625 {
                // Grass, checkered faintly so the ground reads at a glance.
                let square = 16;
                if ((x / square) + (y / square)) % 2 == 0 {
                    [60u8, 130, 60, 255]
                } else {
                    [50, 110, 50, 255]
                }
            } else {
                // Masonry courses.
                let course = 24;
                if y % course < 3 {
                    [120u8, 110, 100, 255]
                } else {
                    [170, 120, 95, 255]
                }
            };
            data.extend_from_slice(&color);
        }
    }
    data
}
