//! wf3d core library: Wavefront OBJ/MTL loading and 3D transform math.
//!
//! Two independent components: the [`math`] module builds the
//! model/view/projection and normal matrices a renderer feeds to a graphics
//! pipeline each frame, and the [`obj`]/[`mtl`] parsers turn OBJ geometry
//! and MTL material text into the indexed tables of an [`ObjModel`]. The
//! renderer itself (window, context, shaders, GPU buffers) lives outside
//! this crate.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mtl;
pub mod obj;

// Re-export commonly used types
pub use camera::OrbitCamera;
pub use error::{ObjError, ObjResult};
pub use geometry::{ObjModel, TriFace, TriangleBuffers, Vertex};
pub use mtl::{load_mtl, parse_mtl, IlluminationModel, Material, MtlLibrary, TextureImage};
pub use obj::{load_obj, parse_obj};
