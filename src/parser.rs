//! Binary STL and vertex-file decoding.

use crate::error::{ConvertError, Field, Result};
use crate::geometry::{Triangle, EMITTED_PER_TRIANGLE};
use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;
use std::io::{self, Read};

/// Size of the ignored STL preamble.
pub const HEADER_LEN: usize = 80;

/// Size of a triangle record with no attribute bytes.
pub const RECORD_LEN: u64 = 50;

/// Bytes before the first triangle record (header + count).
pub const PREAMBLE_LEN: u64 = HEADER_LEN as u64 + 4;

/// Streaming binary STL reader.
///
/// The header and triangle count are consumed on construction; records are
/// then pulled one at a time with [`StlReader::next_triangle`].
pub struct StlReader<R> {
    reader: R,
    triangle_count: u32,
    next_index: u32,
    keep_attributes: bool,
}

impl<R: Read> StlReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut header)
            .map_err(|e| ConvertError::from_read(e, Field::Header, None))?;

        let triangle_count = reader
            .read_u32::<LittleEndian>()
            .map_err(|e| ConvertError::from_read(e, Field::TriangleCount, None))?;

        Ok(Self {
            reader,
            triangle_count,
            next_index: 0,
            keep_attributes: true,
        })
    }

    /// Skip attribute bytes instead of collecting them; returned triangles
    /// then carry an empty `attributes`.
    pub fn discard_attributes(mut self) -> Self {
        self.keep_attributes = false;
        self
    }

    /// Triangle count as declared in the file. Not checked against the data.
    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Read the next record, or `None` once the declared count is reached.
    pub fn next_triangle(&mut self) -> Result<Option<Triangle>> {
        if self.next_index >= self.triangle_count {
            return Ok(None);
        }

        let index = self.next_index;
        match self.read_record(index) {
            Ok(tri) => {
                self.next_index += 1;
                Ok(Some(tri))
            }
            Err(e) => {
                // Nothing after a bad record can be trusted.
                self.next_index = self.triangle_count;
                Err(e)
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_record(&mut self, index: u32) -> Result<Triangle> {
        let normal = self.read_vec3(Field::Normal, index)?;
        let v1 = self.read_vec3(Field::Vertex(1), index)?;
        let v2 = self.read_vec3(Field::Vertex(2), index)?;
        let v3 = self.read_vec3(Field::Vertex(3), index)?;

        let attribute_len = self
            .reader
            .read_u16::<LittleEndian>()
            .map_err(|e| ConvertError::from_read(e, Field::AttributeCount, Some(index)))?;

        let attributes = if self.keep_attributes {
            let mut attributes = vec![0u8; attribute_len as usize];
            self.reader
                .read_exact(&mut attributes)
                .map_err(|e| ConvertError::from_read(e, Field::Attributes, Some(index)))?;
            attributes
        } else {
            let expected = u64::from(attribute_len);
            let skipped = io::copy(&mut (&mut self.reader).take(expected), &mut io::sink())
                .map_err(ConvertError::Read)?;
            if skipped != expected {
                return Err(ConvertError::Truncated {
                    field: Field::Attributes,
                    triangle: Some(index),
                });
            }
            Vec::new()
        };

        Ok(Triangle {
            normal,
            v1,
            v2,
            v3,
            attributes,
        })
    }

    fn read_vec3(&mut self, field: Field, index: u32) -> Result<Vec3> {
        read_vec3(&mut self.reader).map_err(|e| ConvertError::from_read(e, field, Some(index)))
    }
}

impl<R: Read> Iterator for StlReader<R> {
    type Item = Result<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_triangle().transpose()
    }
}

fn read_vec3<R: Read>(reader: &mut R) -> std::io::Result<Vec3> {
    let x = reader.read_f32::<LittleEndian>()?;
    let y = reader.read_f32::<LittleEndian>()?;
    let z = reader.read_f32::<LittleEndian>()?;
    Ok(Vec3::new(x, y, z))
}

/// Decode a whole binary STL held in memory.
pub fn parse_stl(bytes: &[u8]) -> Result<Vec<Triangle>> {
    StlReader::new(bytes)?.collect()
}

/// Decoded vertex file.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexFile {
    /// Count stored in the header (9 per source triangle).
    pub declared_count: u32,
    pub vertices: Vec<Vec3>,
}

impl VertexFile {
    /// Consecutive vertex triples, one per sub-triangle.
    pub fn sub_triangles(&self) -> impl Iterator<Item = &[Vec3]> {
        self.vertices.chunks_exact(3)
    }

    /// Emitted vertices grouped per source triangle.
    pub fn fans(&self) -> impl Iterator<Item = &[Vec3]> {
        self.vertices.chunks_exact(EMITTED_PER_TRIANGLE)
    }
}

/// Decode a vertex file held in memory.
///
/// The body must be a whole number of f32 triples; anything else means the
/// file was cut short.
pub fn parse_vertex_file(bytes: &[u8]) -> Result<VertexFile> {
    let mut reader = bytes;
    let declared_count = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| ConvertError::from_read(e, Field::VertexCount, None))?;

    if reader.len() % 12 != 0 {
        return Err(ConvertError::Truncated {
            field: Field::VertexData,
            triangle: None,
        });
    }

    let mut vertices = Vec::with_capacity(reader.len() / 12);
    while !reader.is_empty() {
        let v = read_vec3(&mut reader)
            .map_err(|e| ConvertError::from_read(e, Field::VertexData, None))?;
        vertices.push(v);
    }

    Ok(VertexFile {
        declared_count,
        vertices,
    })
}
