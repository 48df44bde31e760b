//! Wavefront OBJ parser producing interleaved vertex arrays.
//!
//! Supports `v`, `vt`, `vn` and triangle/quad `f` statements. Other
//! directives (`o`/`g`/`s`/`usemtl`/etc.) are reported and skipped, as are
//! malformed lines; only inconsistent or dangling face references fail the
//! whole parse.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{ObjError, ObjResult},
    face::{self, Corner, FaceError, ListLengths, Triangle},
    layout::{AttributeKind, Layout},
    lexer::{self, LineKind},
    mesh::{IndexedMesh, VertexArray},
};

/// A line that was skipped, or partly ignored, while parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
    pub kind: DiagnosticKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    UnrecognizedDirective(String),
    MalformedVertex {
        kind: AttributeKind,
        expected: usize,
        found: usize,
    },
    MalformedFace(FaceError),
    UnsupportedPolygon { corners: usize },
    /// Non-numeric token on a vertex line; the line itself may still be used.
    IgnoredToken(String),
}

impl DiagnosticKind {
    /// Whether the whole line was dropped.
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::IgnoredToken(_))
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedDirective(tag) => write!(f, "unsupported directive '{tag}'"),
            Self::MalformedVertex {
                kind,
                expected,
                found,
            } => write!(f, "{kind} needs {expected} numbers, found {found}"),
            Self::MalformedFace(err) => write!(f, "malformed face: {err}"),
            Self::UnsupportedPolygon { corners } => {
                write!(f, "{corners}-corner polygon rejected (triangles and quads only)")
            }
            Self::IgnoredToken(token) => write!(f, "ignored non-numeric token '{token}'"),
        }
    }
}

/// Parsed OBJ contents. Immutable once constructed; the `as_*` builders can be
/// called any number of times with different layouts.
#[derive(Clone, Debug)]
pub struct WavefrontParser {
    origin: String,
    positions: Vec<[f32; 3]>,
    /// 2-component `vt` entries are stored with `w = 0`.
    texcoords: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    triangles: Vec<Triangle>,
    diagnostics: Vec<Diagnostic>,
    verbose: bool,
}

impl WavefrontParser {
    /// Load and parse an OBJ file.
    pub fn from_path(path: impl AsRef<Path>, verbose: bool) -> ObjResult<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|source| ObjError::Io {
            origin: origin.clone(),
            source,
        })?;
        Self::parse(BufReader::new(file), origin, verbose)
    }

    /// Parse OBJ text from a [`BufRead`] implementation.
    pub fn from_reader<R: BufRead>(reader: R, verbose: bool) -> ObjResult<Self> {
        Self::parse(reader, "<reader>".to_owned(), verbose)
    }

    /// Convenience helper to parse an OBJ string literal.
    pub fn from_source(source: &str, verbose: bool) -> ObjResult<Self> {
        Self::parse(io::Cursor::new(source), "<string>".to_owned(), verbose)
    }

    fn parse<R: BufRead>(reader: R, origin: String, verbose: bool) -> ObjResult<Self> {
        let mut parser = Self {
            origin,
            positions: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            triangles: Vec::new(),
            diagnostics: Vec::new(),
            verbose,
        };

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ObjError::Io {
                origin: format!("{} (line {})", parser.origin, line_idx + 1),
                source,
            })?;
            parser.parse_line(line_idx + 1, &line);
        }

        parser.finish()?;
        Ok(parser)
    }

    fn parse_line(&mut self, line_no: usize, line: &str) {
        let text = lexer::strip_comment(line);
        let Some((kind, args)) = lexer::classify(text) else {
            return;
        };

        match kind {
            LineKind::Position => self.push_vertex(AttributeKind::Position, line_no, text, args),
            LineKind::TexCoord => self.push_vertex(AttributeKind::TexCoord, line_no, text, args),
            LineKind::Normal => self.push_vertex(AttributeKind::Normal, line_no, text, args),
            LineKind::Face => self.push_face(line_no, text, args),
            LineKind::Unrecognized(tag) => self.report(
                line_no,
                text,
                DiagnosticKind::UnrecognizedDirective(tag.to_owned()),
            ),
        }
    }

    fn push_vertex(&mut self, kind: AttributeKind, line_no: usize, text: &str, args: &str) {
        let (min, max) = match kind {
            AttributeKind::TexCoord => (2, 3),
            AttributeKind::Position | AttributeKind::Normal => (3, 3),
        };

        // A bad token inside the required components drops the whole line.
        let (values, rejected) = lexer::extract_floats(args, max);
        if values.len() < min {
            self.report(
                line_no,
                text,
                DiagnosticKind::MalformedVertex {
                    kind,
                    expected: min,
                    found: values.len(),
                },
            );
            return;
        }
        for token in rejected {
            self.report(line_no, text, DiagnosticKind::IgnoredToken(token.to_owned()));
        }

        let mut value = [0.0_f32; 3];
        for (slot, v) in value.iter_mut().zip(values) {
            *slot = v;
        }
        match kind {
            AttributeKind::Position => self.positions.push(value),
            AttributeKind::TexCoord => self.texcoords.push(value),
            AttributeKind::Normal => self.normals.push(value),
        }
    }

    fn push_face(&mut self, line_no: usize, text: &str, args: &str) {
        let lengths = ListLengths {
            positions: self.positions.len(),
            texcoords: self.texcoords.len(),
            normals: self.normals.len(),
        };

        match face::parse_face(args, lengths) {
            Ok(triangles) => self
                .triangles
                .extend(triangles.into_iter().map(|corners| Triangle {
                    line: line_no,
                    corners,
                })),
            Err(FaceError::TooManyCorners(corners)) => {
                self.report(line_no, text, DiagnosticKind::UnsupportedPolygon { corners })
            }
            Err(err) => self.report(line_no, text, DiagnosticKind::MalformedFace(err)),
        }
    }

    fn report(&mut self, line: usize, text: &str, kind: DiagnosticKind) {
        let text = text.trim();
        match kind {
            DiagnosticKind::UnsupportedPolygon { .. } => {
                log::warn!("{}:{} '{}': {}", self.origin, line, text, kind)
            }
            _ if self.verbose => log::info!("{}:{} '{}': {}", self.origin, line, text, kind),
            _ => log::debug!("{}:{} '{}': {}", self.origin, line, text, kind),
        }
        self.diagnostics.push(Diagnostic {
            line,
            text: text.to_owned(),
            kind,
        });
    }

    /// Validate face references once every line has been read.
    fn finish(&self) -> ObjResult<()> {
        check_presence(&self.triangles, AttributeKind::TexCoord, |c| c.texcoord)?;
        check_presence(&self.triangles, AttributeKind::Normal, |c| c.normal)?;

        for tri in &self.triangles {
            for corner in tri.corners {
                let refs = [
                    (AttributeKind::Position, Some(corner.position), self.positions.len()),
                    (AttributeKind::TexCoord, corner.texcoord, self.texcoords.len()),
                    (AttributeKind::Normal, corner.normal, self.normals.len()),
                ];
                for (kind, index, len) in refs {
                    match index {
                        Some(index) if index >= len => {
                            return Err(ObjError::IndexOutOfRange {
                                line: tri.line,
                                kind,
                                index: index + 1,
                                len,
                            });
                        }
                        _ => {}
                    }
                }
            }
        }

        let skipped = self.diagnostics.iter().filter(|d| d.kind.is_skip()).count();
        let summary = format!(
            "Parsed {}: {} positions, {} texcoords, {} normals, {} triangles, {} skipped lines",
            self.origin,
            self.positions.len(),
            self.texcoords.len(),
            self.normals.len(),
            self.triangles.len(),
            skipped
        );
        if self.verbose {
            log::info!("{summary}");
        } else {
            log::debug!("{summary}");
        }
        if self.triangles.is_empty() {
            log::warn!("OBJ {} contained no triangles", self.origin);
        }
        Ok(())
    }

    /// One interleaved record per face corner, for non-indexed drawing.
    pub fn as_flat(&self, layout: &Layout) -> ObjResult<VertexArray> {
        self.check_layout(layout)?;
        self.interleave(layout, self.corners())
    }

    /// Unique records in first-seen order plus one index per face corner.
    pub fn as_indexed(&self, layout: &Layout) -> ObjResult<IndexedMesh> {
        self.check_layout(layout)?;

        let mut table = VertexTable::default();
        let mut indices = Vec::with_capacity(self.corner_count());
        for corner in self.corners() {
            indices.push(table.insert(corner)?);
        }

        let vertices = self.interleave(layout, table.unique.iter().copied())?;
        Ok(IndexedMesh::new(vertices, indices))
    }

    fn check_layout(&self, layout: &Layout) -> ObjResult<()> {
        match layout.entries().iter().find(|e| !self.has(e.kind)) {
            Some(entry) => Err(ObjError::MissingAttribute { kind: entry.kind }),
            None => Ok(()),
        }
    }

    fn interleave(
        &self,
        layout: &Layout,
        corners: impl Iterator<Item = Corner>,
    ) -> ObjResult<VertexArray> {
        let stride = layout.stride();
        let mut data = Vec::with_capacity(self.corner_count() * stride);
        for corner in corners {
            for entry in layout.entries() {
                let value = self
                    .attribute(corner, entry.kind)
                    .ok_or(ObjError::MissingAttribute { kind: entry.kind })?;
                // Truncate, then zero-pad past the natural arity.
                data.extend((0..entry.components).map(|c| value.get(c).copied().unwrap_or(0.0)));
            }
        }
        Ok(VertexArray::new(data, stride))
    }

    fn attribute(&self, corner: Corner, kind: AttributeKind) -> Option<&[f32; 3]> {
        match kind {
            AttributeKind::Position => self.positions.get(corner.position),
            AttributeKind::TexCoord => corner.texcoord.and_then(|i| self.texcoords.get(i)),
            AttributeKind::Normal => corner.normal.and_then(|i| self.normals.get(i)),
        }
    }

    /// Whether `kind` has parsed entries that the faces actually reference.
    pub fn has(&self, kind: AttributeKind) -> bool {
        let referenced = |c: &Corner| match kind {
            AttributeKind::Position => true,
            AttributeKind::TexCoord => c.texcoord.is_some(),
            AttributeKind::Normal => c.normal.is_some(),
        };
        let defined = match kind {
            AttributeKind::Position => !self.positions.is_empty(),
            AttributeKind::TexCoord => !self.texcoords.is_empty(),
            AttributeKind::Normal => !self.normals.is_empty(),
        };
        defined
            && self
                .triangles
                .first()
                .is_none_or(|tri| referenced(&tri.corners[0]))
    }

    fn corners(&self) -> impl Iterator<Item = Corner> + '_ {
        self.triangles.iter().flat_map(|tri| tri.corners)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn texcoords(&self) -> &[[f32; 3]] {
        &self.texcoords
    }

    #[inline]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn corner_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Texcoord/normal references must appear on every corner or on none.
fn check_presence(
    triangles: &[Triangle],
    kind: AttributeKind,
    index: impl Fn(&Corner) -> Option<usize>,
) -> ObjResult<()> {
    let mut present_line = None;
    let mut absent_line = None;
    for tri in triangles {
        for corner in &tri.corners {
            let slot = if index(corner).is_some() {
                &mut present_line
            } else {
                &mut absent_line
            };
            if slot.is_none() {
                *slot = Some(tri.line);
            }
        }
        if let (Some(present_line), Some(absent_line)) = (present_line, absent_line) {
            return Err(ObjError::InconsistentAttributes {
                kind,
                present_line,
                absent_line,
            });
        }
    }
    Ok(())
}

/// Dedup table for indexed output: corner identity -> dense index.
#[derive(Default)]
struct VertexTable {
    lookup: HashMap<Corner, u32>,
    unique: Vec<Corner>,
}

impl VertexTable {
    fn insert(&mut self, corner: Corner) -> ObjResult<u32> {
        if let Some(&index) = self.lookup.get(&corner) {
            return Ok(index);
        }
        let index = u32::try_from(self.unique.len()).map_err(|_| ObjError::TooManyVertices)?;
        self.unique.push(corner);
        self.lookup.insert(corner, index);
        Ok(index)
    }
}
