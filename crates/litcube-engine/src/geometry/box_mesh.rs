/// Number of distinct corners in the box mesh.
pub const BOX_VERTEX_COUNT: usize = 8;

/// Number of indices in the box mesh (12 triangles).
pub const BOX_INDEX_COUNT: usize = 36;

// Corners of the unit box, half-extent 0.5.
// Bit layout of the index: +x for 1/2/5/6, +y for 2/3/6/7, +z for 0..=3.
const UNIT_CORNERS: [[f32; 3]; BOX_VERTEX_COUNT] = [
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
];

// Two counter-clockwise triangles per face, viewed from outside.
const BOX_INDICES: [u16; BOX_INDEX_COUNT] = [
    0, 1, 2, 0, 2, 3, // front  (+z)
    1, 5, 6, 1, 6, 2, // right  (+x)
    5, 4, 7, 5, 7, 6, // back   (-z)
    4, 0, 3, 4, 3, 7, // left   (-x)
    3, 2, 6, 3, 6, 7, // top    (+y)
    4, 5, 1, 4, 1, 0, // bottom (-y)
];

/// Axis-aligned box centred on the origin.
///
/// The box shares its eight corners between faces, so each vertex normal is
/// the normalized corner direction rather than a face normal.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u16>,
}

impl BoxGeometry {
    /// Builds the unit box scaled by `size` (edge length == `size`).
    pub fn new(size: f32) -> Self {
        let positions = UNIT_CORNERS
            .iter()
            .flat_map(|c| c.map(|v| v * size))
            .collect();

        let normals = UNIT_CORNERS
            .iter()
            .flat_map(|c| {
                let len = (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
                c.map(|v| v / len)
            })
            .collect();

        Self {
            positions,
            normals,
            indices: BOX_INDICES.to_vec(),
        }
    }

    /// Vertex positions, three floats per vertex.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Vertex normals, three floats per vertex.
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Triangle-list indices.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sizes ─────────────────────────────────────────────────────────────

    #[test]
    fn box_at_scale_two_has_expected_lengths() {
        let mesh = BoxGeometry::new(2.0);
        assert_eq!(mesh.positions().len(), 24);
        assert_eq!(mesh.normals().len(), 24);
        assert_eq!(mesh.indices().len(), 36);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn indices_reference_existing_vertices() {
        let mesh = BoxGeometry::new(2.0);
        assert!(mesh.indices().iter().all(|&i| i <= 7));
    }

    #[test]
    fn every_corner_is_used() {
        let mesh = BoxGeometry::new(2.0);
        for v in 0..BOX_VERTEX_COUNT as u16 {
            assert!(mesh.indices().contains(&v), "corner {v} unused");
        }
    }

    // ── scale ─────────────────────────────────────────────────────────────

    #[test]
    fn scale_two_spans_minus_one_to_one() {
        let mesh = BoxGeometry::new(2.0);
        assert!(mesh.positions().iter().all(|&p| p == 1.0 || p == -1.0));
    }

    #[test]
    fn normals_are_unit_length_and_point_outward() {
        let mesh = BoxGeometry::new(2.0);
        for (p, n) in mesh.positions().chunks(3).zip(mesh.normals().chunks(3)) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-6);
            for axis in 0..3 {
                assert_eq!(p[axis].signum(), n[axis].signum());
            }
        }
    }

    #[test]
    fn normals_do_not_depend_on_size() {
        assert_eq!(BoxGeometry::new(2.0).normals(), BoxGeometry::new(5.0).normals());
    }
}
