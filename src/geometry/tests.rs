use super::backdrop::{
    ring_base, AXIS_XZ, FLAGPOLE_RES, RING_STRIDE, RING_VERTEX_BASE, SHAFT_BOTTOM, SHAFT_RADIUS,
    TRUCK_CROWN, TRUCK_CROWN_RADIUS,
};
use super::grid::{FLAG_COLUMNS, FLAG_ROWS};
use super::*;

use approx::assert_relative_eq;
use assert_fs::prelude::*;
use glam::{Vec2, Vec3};
use pollster::FutureExt;
use wgpu::Instance;

fn create_test_device() -> (wgpu::Device, wgpu::Queue) {
    let instance = Instance::default();
    instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .block_on()
        .expect("Failed to find an appropriate adapter")
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
            },
            None,
        )
        .block_on()
        .expect("Failed to create device")
}

fn position(data: &MeshData, index: u16) -> Vec3 {
    let p = data.vertices[index as usize].position;
    Vec3::new(p[0], p[1], p[2])
}

/// Geometric normal of triangle `tri` as wound by the index list.
fn triangle_normal(data: &MeshData, tri: usize) -> Vec3 {
    let a = position(data, data.indices[3 * tri]);
    let b = position(data, data.indices[3 * tri + 1]);
    let c = position(data, data.indices[3 * tri + 2]);
    (b - a).cross(c - a).normalize()
}

#[test]
fn test_flag_vertex_size() {
    assert_eq!(
        std::mem::size_of::<FlagVertex>(),
        48, // 3 vec4s of f32
        "FlagVertex size should be 48 bytes"
    );
}

#[test]
fn test_vertex_buffer_layout() {
    let layout = FlagVertex::desc();
    assert_eq!(layout.array_stride, 48);
    assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    assert_eq!(layout.attributes.len(), 3);
}

#[test]
fn test_grid_counts_and_index_range() {
    for (columns, rows) in [(2, 2), (3, 2), (5, 7), (FLAG_COLUMNS, FLAG_ROWS)] {
        let data = build_grid(columns, rows, Vec2::ZERO, Vec2::ONE);
        assert_eq!(data.vertices.len() as u32, columns * rows);
        assert_eq!(data.indices.len() as u32, 6 * (columns - 1) * (rows - 1));
        let vertex_count = data.vertices.len() as u16;
        assert!(
            data.indices.iter().all(|&i| i < vertex_count),
            "{}x{} grid emitted an out-of-range index",
            columns,
            rows
        );
    }
}

#[test]
fn test_grid_3x2_concrete() {
    let data = build_grid(3, 2, Vec2::ZERO, Vec2::ONE);
    let expected = [
        [0.0, 0.0],
        [0.5, 0.0],
        [1.0, 0.0],
        [0.0, 1.0],
        [0.5, 1.0],
        [1.0, 1.0],
    ];
    assert_eq!(data.vertices.len(), 6);
    assert_eq!(data.indices.len(), 12);
    for (vertex, exp) in data.vertices.iter().zip(expected) {
        assert_relative_eq!(vertex.position[0], exp[0]);
        assert_relative_eq!(vertex.position[1], exp[1]);
        assert_relative_eq!(vertex.position[2], 0.0);
        assert_relative_eq!(vertex.position[3], 1.0);
    }
    assert!(data.indices.iter().all(|&i| i < 6));
}

#[test]
fn test_grid_positions_interpolate_rectangle() {
    let lo = Vec2::new(0.0, -0.375);
    let hi = Vec2::new(1.0, 0.375);
    let data = build_grid(FLAG_COLUMNS, FLAG_ROWS, lo, hi);
    let step = (hi - lo) / Vec2::new((FLAG_COLUMNS - 1) as f32, (FLAG_ROWS - 1) as f32);

    for row in 0..FLAG_ROWS {
        for col in 0..FLAG_COLUMNS {
            let v = &data.vertices[(row * FLAG_COLUMNS + col) as usize];
            assert_relative_eq!(v.position[0], lo.x + step.x * col as f32);
            assert_relative_eq!(v.position[1], lo.y + step.y * row as f32);
        }
    }

    let last = data.vertices.last().unwrap();
    assert_relative_eq!(last.position[0], hi.x, epsilon = 1e-5);
    assert_relative_eq!(last.position[1], hi.y, epsilon = 1e-5);
}

#[test]
fn test_grid_texcoords_interpolate() {
    let data = build_grid(4, 3, Vec2::ZERO, Vec2::ONE);
    let corner = |row: u32, col: u32| &data.vertices[(row * 4 + col) as usize].tex_coord;
    assert_eq!(&corner(0, 0)[..2], &[0.0, 0.0]);
    assert_eq!(&corner(0, 3)[..2], &[1.0, 0.0]);
    assert_eq!(&corner(2, 0)[..2], &[0.0, 1.0]);
    assert_eq!(&corner(2, 3)[..2], &[1.0, 1.0]);
    assert_relative_eq!(corner(1, 1)[0], 1.0 / 3.0);
    assert_relative_eq!(corner(1, 1)[1], 0.5);
}

#[test]
fn test_grid_winding_consistent() {
    let data = build_grid(7, 5, Vec2::ZERO, Vec2::ONE);
    // Every triangle faces the constant vertex normal (0, 0, -1).
    for tri in 0..data.indices.len() / 3 {
        assert!(
            triangle_normal(&data, tri).z < 0.0,
            "triangle {} winds against the grid normal",
            tri
        );
    }
}

#[test]
fn test_flag_mesh_data() {
    let data = build_flag();
    assert_eq!(data.vertices.len(), 7500);
    assert_eq!(data.indices.len(), 6 * 99 * 74);
    for vertex in &data.vertices {
        assert_eq!(&vertex.normal[..3], &[0.0, 0.0, -1.0]);
    }
}

#[test]
fn test_backdrop_counts_and_index_range() {
    let data = build_backdrop();
    let expected_vertices = RING_VERTEX_BASE + RING_STRIDE * FLAGPOLE_RES + 1;
    assert_eq!(data.vertices.len() as u32, expected_vertices);
    assert_eq!(data.indices.len() as u32, 12 + 3 * 8 * FLAGPOLE_RES);
    let vertex_count = data.vertices.len() as u16;
    assert!(data.indices.iter().all(|&i| i < vertex_count));
}

#[test]
fn test_backdrop_ground_faces_up() {
    let data = build_backdrop();
    for tri in 0..2 {
        let normal = triangle_normal(&data, tri);
        assert_relative_eq!(normal.x, 0.0);
        assert_relative_eq!(normal.y, 1.0);
        assert_relative_eq!(normal.z, 0.0);
    }
}

#[test]
fn test_backdrop_wall_faces_camera() {
    let data = build_backdrop();
    for tri in 2..4 {
        let normal = triangle_normal(&data, tri);
        assert_relative_eq!(normal.x, 0.0);
        assert_relative_eq!(normal.y, 0.0);
        assert_relative_eq!(normal.z, -1.0);
    }
}

#[test]
fn test_flagpole_ring_layout() {
    let data = build_backdrop();
    let axis = Vec3::new(AXIS_XZ[0], 0.0, AXIS_XZ[1]);

    for ring in 0..FLAGPOLE_RES {
        let base = ring_base(ring);
        let crown = position(&data, base);
        assert_relative_eq!(crown.y, TRUCK_CROWN);
        let radial = Vec3::new(crown.x - axis.x, 0.0, crown.z - axis.z);
        assert_relative_eq!(radial.length(), TRUCK_CROWN_RADIUS, epsilon = 1e-6);

        // The side-wall normal is the unit radial direction.
        let normal = data.vertices[base as usize].normal;
        assert_relative_eq!(radial.normalize().x, normal[0], epsilon = 1e-6);
        assert_relative_eq!(radial.normalize().z, normal[2], epsilon = 1e-6);

        // The duplicated shaft-bottom vertex shares its position but carries
        // the bottom cap's normal.
        let shaft_bottom = position(&data, base + 3);
        let duplicate = position(&data, base + 4);
        assert_eq!(shaft_bottom, duplicate);
        assert_relative_eq!(shaft_bottom.y, SHAFT_BOTTOM);
        let shaft_radial = Vec3::new(shaft_bottom.x - axis.x, 0.0, shaft_bottom.z - axis.z);
        assert_relative_eq!(shaft_radial.length(), SHAFT_RADIUS, epsilon = 1e-6);
        assert_eq!(&data.vertices[(base + 4) as usize].normal[..3], &[0.0, -1.0, 0.0]);
    }
}

#[test]
fn test_flagpole_seam_closes() {
    let data = build_backdrop();
    // The last angular segment's triangles reference ring 0 again.
    let last_segment = &data.indices[data.indices.len() - 24..];
    assert!(
        last_segment.contains(&(RING_VERTEX_BASE as u16)),
        "closing segment does not stitch back to ring 0"
    );
    assert_eq!(ring_base(FLAGPOLE_RES), ring_base(0));
}

#[test]
fn test_flagpole_cap_windings() {
    let data = build_backdrop();
    let segments = FLAGPOLE_RES as usize;
    for segment in 0..segments {
        let first_tri = 4 + segment * 8;
        assert!(
            triangle_normal(&data, first_tri).y > 0.0,
            "top cap triangle {} does not face up",
            segment
        );
        assert!(
            triangle_normal(&data, first_tri + 7).y < 0.0,
            "bottom cap triangle {} does not face down",
            segment
        );
    }
}

#[test]
fn test_mesh_rejects_out_of_range_index() {
    let (device, _queue) = create_test_device();
    let data = build_grid(2, 2, Vec2::ZERO, Vec2::ONE);
    let mut indices = data.indices.clone();
    indices[0] = data.vertices.len() as u16;

    let result = Mesh::new(&device, "Broken", &data.vertices, &indices, MeshUsage::Static);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("out of range"));
}

#[test]
fn test_mesh_upload_roundtrip() {
    let (device, queue) = create_test_device();
    let data = build_grid(3, 3, Vec2::ZERO, Vec2::ONE);
    let mesh = Mesh::new(&device, "Flag", &data.vertices, &data.indices, MeshUsage::Stream).unwrap();

    let vertex_bytes = mesh.vertex_buffer.size();
    let index_bytes = mesh.index_buffer.size();
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.num_elements, 24);

    // Same count and layout: a pure data refresh.
    let mut moved = data.vertices.clone();
    for vertex in &mut moved {
        vertex.position[2] += 0.25;
    }
    mesh.upload_vertices(&queue, &moved).unwrap();
    assert_eq!(mesh.vertex_buffer.size(), vertex_bytes);
    assert_eq!(mesh.index_buffer.size(), index_bytes);
    assert_eq!(mesh.num_elements, 24);

    // A different count is a shape change, not a refresh.
    let truncated = &data.vertices[..8];
    assert!(mesh.upload_vertices(&queue, truncated).is_err());
}

#[test]
fn test_mesh_upload_requires_stream_usage() {
    let (device, queue) = create_test_device();
    let data = build_backdrop();
    let mesh =
        Mesh::new(&device, "Backdrop", &data.vertices, &data.indices, MeshUsage::Static).unwrap();
    assert!(mesh.upload_vertices(&queue, &data.vertices).is_err());
}

#[test]
fn test_texture_from_path() {
    let (device, queue) = create_test_device();
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("flag.png");
    image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 40, 40, 255]))
        .save(file.path())
        .unwrap();

    let texture = Texture::from_path(&device, &queue, file.path(), Some("test_texture")).unwrap();
    assert_eq!(texture.texture.size().width, 8);
    assert_eq!(texture.texture.size().height, 4);
}

#[test]
fn test_texture_from_pixels_validates_length() {
    let (device, queue) = create_test_device();
    let result = Texture::from_pixels(&device, &queue, 4, 4, &[0u8; 12], Some("short"));
    assert!(result.is_err());
}

#[test]
fn test_backdrop_mesh_creation() {
    let (device, _queue) = create_test_device();
    let data = build_backdrop();
    let mesh =
        Mesh::new(&device, "Backdrop", &data.vertices, &data.indices, MeshUsage::Static).unwrap();
    assert_eq!(mesh.num_elements as usize, data.indices.len());
    assert_eq!(mesh.vertex_count() as usize, data.vertices.len());
}
