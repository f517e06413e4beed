pub mod engine;
pub mod tessellate;
pub mod vertex;

pub use engine::GraphicsEngine;
pub use tessellate::tessellate;
pub use vertex::{Vertex, VertexBuffer};
