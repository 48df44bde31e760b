//! Asset loading: Wavefront OBJ meshes into interleaved CPU-side arrays.
//!
//! ```no_run
//! use asset::{Layout, WavefrontParser};
//!
//! let obj = WavefrontParser::from_path("assets/cube.obj", false)?;
//! let layout: Layout = "P3_T2".parse()?;
//! let mesh = obj.as_indexed(&layout)?;
//! println!("{} vertices, {} indices", mesh.vertices.len(), mesh.indices.len());
//! # Ok::<(), asset::ObjError>(())
//! ```

pub mod error;
pub mod face;
pub mod layout;
pub mod lexer;
pub mod mesh;
pub mod obj;

pub use error::{ObjError, ObjResult};
pub use face::{Corner, FaceError, Triangle};
pub use layout::{AttributeKind, Layout, LayoutEntry};
pub use mesh::{IndexedMesh, VertexArray};
pub use obj::{Diagnostic, DiagnosticKind, WavefrontParser};
