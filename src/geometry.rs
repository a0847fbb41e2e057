use glam::Vec3;

/// Vertex triples written to the body per source triangle.
pub const EMITTED_PER_TRIANGLE: usize = 6;

/// Amount the header count grows by per source triangle
/// (3 sub-triangles x 3 vertices).
pub const VERTICES_PER_TRIANGLE: u32 = 9;

/// One decoded binary STL facet.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub normal: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    /// Trailing attribute bytes, usually empty.
    pub attributes: Vec<u8>,
}

impl Triangle {
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self {
            normal: Vec3::ZERO,
            v1,
            v2,
            v3,
            attributes: Vec::new(),
        }
    }

    /// Arithmetic mean of the three vertices, in single precision.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.v1 + self.v2 + self.v3) / 3.0
    }
}

/// Split a triangle into three around its centroid.
///
/// Returns `v1, c, v2, c, v3, c`. Original vertices are copied, not
/// recomputed, so their bit patterns are preserved.
#[inline]
pub fn fan_subdivide(tri: &Triangle) -> [Vec3; EMITTED_PER_TRIANGLE] {
    let c = tri.centroid();
    [tri.v1, c, tri.v2, c, tri.v3, c]
}
