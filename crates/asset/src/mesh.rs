//! CPU-side vertex arrays produced by the loader, ready for upload.

/// Row-major interleaved `f32` records, `stride` floats per row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexArray {
    data: Vec<f32>,
    stride: usize,
}

impl VertexArray {
    /// `data.len()` must be a multiple of `stride`.
    pub fn new(data: Vec<f32>, stride: usize) -> Self {
        debug_assert!(if stride == 0 { data.is_empty() } else { data.len() % stride == 0 });
        Self { data, stride }
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.data.len() / self.stride
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.stride)?;
        self.data.get(start..start.checked_add(self.stride)?)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.stride.max(1))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Deduplicated vertices plus one index per face corner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: VertexArray,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn new(vertices: VertexArray, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Expand back to one record per corner, the non-indexed form.
    /// Returns `None` if an index points past the vertex array.
    pub fn expand(&self) -> Option<VertexArray> {
        let stride = self.vertices.stride();
        let mut data = Vec::with_capacity(self.indices.len() * stride);
        for &index in &self.indices {
            data.extend_from_slice(self.vertices.row(index as usize)?);
        }
        Some(VertexArray::new(data, stride))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_stride() {
        let array = VertexArray::new(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(array.len(), 2);
        assert_eq!(array.row(1), Some(&[3.0, 4.0, 5.0][..]));
        assert_eq!(array.row(2), None);
        assert_eq!(array.rows().count(), 2);
        assert_eq!(array.as_bytes().len(), 6 * 4);
    }

    #[test]
    fn expand_indexes_vertices() {
        let mesh = IndexedMesh::new(VertexArray::new(vec![1.0, 2.0, 3.0, 4.0], 2), vec![1, 0, 1]);
        assert!(mesh.is_valid());
        let flat = mesh.expand().expect("indices in range");
        assert_eq!(flat.as_slice(), &[3.0, 4.0, 1.0, 2.0, 3.0, 4.0]);

        let broken = IndexedMesh::new(VertexArray::new(vec![1.0], 1), vec![3]);
        assert_eq!(broken.expand(), None);
    }

    #[test]
    fn default_is_empty() {
        let mesh = IndexedMesh::default();
        assert!(!mesh.is_valid());
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.vertices.rows().count(), 0);
    }
}
