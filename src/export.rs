use crate::error::{ConvertError, Result};
use crate::geometry::{fan_subdivide, Triangle, VERTICES_PER_TRIANGLE};
use crate::parser::HEADER_LEN;
use byteorder::{LittleEndian, WriteBytesExt};
use glam::Vec3;
use std::io::{BufWriter, Write};

/// Buffered writer for the vertex format.
pub struct VertexWriter<W: Write> {
    buf: BufWriter<W>,
    bytes_written: u64,
}

impl<W: Write> VertexWriter<W> {
    pub fn new(writer: W, capacity: usize) -> Self {
        Self {
            buf: BufWriter::with_capacity(capacity.max(1), writer),
            bytes_written: 0,
        }
    }

    /// Write the vertex count header for `triangle_count` source triangles.
    /// Returns the count that was written.
    pub fn write_header(&mut self, triangle_count: u32) -> Result<u32> {
        let vertex_count = triangle_count
            .checked_mul(VERTICES_PER_TRIANGLE)
            .ok_or(ConvertError::CountOverflow {
                triangles: triangle_count,
            })?;

        self.buf
            .write_u32::<LittleEndian>(vertex_count)
            .map_err(ConvertError::Write)?;
        self.bytes_written += 4;
        Ok(vertex_count)
    }

    /// Write the six centroid-fan triples for one triangle.
    pub fn write_fan(&mut self, tri: &Triangle) -> Result<()> {
        for v in fan_subdivide(tri) {
            write_vec3(&mut self.buf, v).map_err(ConvertError::Write)?;
        }
        self.bytes_written += 6 * 12;
        Ok(())
    }

    /// Flush buffered output and return the total bytes written.
    pub fn finish(mut self) -> Result<u64> {
        self.buf.flush().map_err(ConvertError::Write)?;
        Ok(self.bytes_written)
    }
}

fn write_vec3<W: Write>(writer: &mut W, v: Vec3) -> std::io::Result<()> {
    writer.write_f32::<LittleEndian>(v.x)?;
    writer.write_f32::<LittleEndian>(v.y)?;
    writer.write_f32::<LittleEndian>(v.z)?;
    Ok(())
}

/// Encode triangles as a binary STL.
pub fn write_stl<W: Write>(writer: &mut W, triangles: &[Triangle]) -> Result<()> {
    // Wrap in BufWriter for better I/O performance (64KB buffer)
    let mut buf = BufWriter::with_capacity(64 * 1024, writer);

    // 80 bytes header
    buf.write_all(&[0u8; HEADER_LEN]).map_err(ConvertError::Write)?;

    let count = u32::try_from(triangles.len()).map_err(|_| ConvertError::CountOverflow {
        triangles: u32::MAX,
    })?;
    buf.write_u32::<LittleEndian>(count)
        .map_err(ConvertError::Write)?;

    for tri in triangles {
        write_stl_record(&mut buf, tri).map_err(ConvertError::Write)?;
    }

    buf.flush().map_err(ConvertError::Write)?;
    Ok(())
}

fn write_stl_record<W: Write>(writer: &mut W, tri: &Triangle) -> std::io::Result<()> {
    write_vec3(writer, tri.normal)?;
    write_vec3(writer, tri.v1)?;
    write_vec3(writer, tri.v2)?;
    write_vec3(writer, tri.v3)?;

    let attribute_len = u16::try_from(tri.attributes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "more than 65535 attribute bytes",
        )
    })?;
    writer.write_u16::<LittleEndian>(attribute_len)?;
    writer.write_all(&tri.attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_nine_per_triangle() {
        let mut out = Vec::new();
        let mut writer = VertexWriter::new(&mut out, 16);
        assert_eq!(writer.write_header(7).unwrap(), 63);
        assert_eq!(writer.finish().unwrap(), 4);
        assert_eq!(out, 63u32.to_le_bytes());
    }

    #[test]
    fn test_header_overflow() {
        let mut writer = VertexWriter::new(Vec::new(), 16);
        let err = writer.write_header(u32::MAX / 8).unwrap_err();
        assert!(matches!(err, ConvertError::CountOverflow { .. }));
    }

    #[test]
    fn test_fan_layout() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        let mut out = Vec::new();
        let mut writer = VertexWriter::new(&mut out, 16);
        writer.write_fan(&tri).unwrap();
        assert_eq!(writer.finish().unwrap(), 72);

        let floats: Vec<f32> = out
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(
            floats,
            vec![
                0.0, 0.0, 0.0, 1.0, 1.0, 0.0, //
                3.0, 0.0, 0.0, 1.0, 1.0, 0.0, //
                0.0, 3.0, 0.0, 1.0, 1.0, 0.0,
            ]
        );
    }

    #[test]
    fn test_stl_record_size() {
        let mut tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let mut out = Vec::new();
        write_stl(&mut out, &[tri.clone()]).unwrap();
        assert_eq!(out.len(), 84 + 50);

        tri.attributes = vec![9, 9];
        out.clear();
        write_stl(&mut out, &[tri]).unwrap();
        assert_eq!(out.len(), 84 + 52);
        assert_eq!(&out[84 + 48..84 + 50], &2u16.to_le_bytes());
    }
}
