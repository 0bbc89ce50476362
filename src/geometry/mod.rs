mod backdrop;
mod grid;
mod material;
mod mesh;
mod texture;
mod vertex;

pub use backdrop::build_backdrop;
pub use grid::{build_flag, build_grid};
pub use material::Material;
pub use mesh::{Mesh, MeshData, MeshUsage};
pub use texture::Texture;
pub use vertex::FlagVertex;

#[cfg(test)]
mod tests;
