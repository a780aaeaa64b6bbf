//! CPU-side mesh data.
//!
//! Geometry is produced as flat arrays ready for upload: three floats per
//! vertex for positions and normals, `u16` triangle-list indices.

mod box_mesh;

pub use box_mesh::{BoxGeometry, BOX_INDEX_COUNT, BOX_VERTEX_COUNT};
