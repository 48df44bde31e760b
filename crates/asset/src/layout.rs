//! Interleaved attribute layouts such as `P3_T2_N3`.

use std::{fmt, str::FromStr};

use crate::error::{ObjError, ObjResult};

/// Vertex attribute kinds an OBJ file can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] = [Self::Position, Self::TexCoord, Self::Normal];

    /// Letter used in layout strings.
    pub fn letter(self) -> char {
        match self {
            Self::Position => 'P',
            Self::TexCoord => 'T',
            Self::Normal => 'N',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'P' => Some(Self::Position),
            'T' => Some(Self::TexCoord),
            'N' => Some(Self::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "position",
            Self::TexCoord => "texture coordinate",
            Self::Normal => "normal",
        })
    }
}

/// One attribute slot of an interleaved record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutEntry {
    pub kind: AttributeKind,
    /// Requested component count (1..=9). Truncates or zero-pads the natural arity.
    pub components: usize,
}

impl LayoutEntry {
    pub fn new(kind: AttributeKind, components: usize) -> Self {
        Self { kind, components }
    }
}

/// Ordered, non-empty list of attribute slots, each kind at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
}

impl Layout {
    pub const MAX_COMPONENTS: usize = 9;

    pub fn new(entries: Vec<LayoutEntry>) -> ObjResult<Self> {
        let invalid = |reason: String| ObjError::InvalidLayout {
            layout: describe(&entries),
            reason,
        };

        if entries.is_empty() {
            return Err(invalid("layout is empty".into()));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.components == 0 || entry.components > Self::MAX_COMPONENTS {
                return Err(invalid(format!(
                    "{} component count must be in 1..={}, got {}",
                    entry.kind,
                    Self::MAX_COMPONENTS,
                    entry.components
                )));
            }
            if entries[..i].iter().any(|e| e.kind == entry.kind) {
                return Err(invalid(format!("{} listed more than once", entry.kind)));
            }
        }

        Ok(Self { entries })
    }

    #[inline]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Floats per interleaved record.
    pub fn stride(&self) -> usize {
        self.entries.iter().map(|e| e.components).sum()
    }

    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }
}

impl FromStr for Layout {
    type Err = ObjError;

    fn from_str(s: &str) -> ObjResult<Self> {
        let invalid = |reason: String| ObjError::InvalidLayout {
            layout: s.to_owned(),
            reason,
        };

        let mut entries = Vec::new();
        for token in s.split('_') {
            let mut chars = token.chars();
            let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next())
            else {
                return Err(invalid(format!(
                    "expected <Letter><Digit> tokens joined by '_', found '{token}'"
                )));
            };
            let kind = AttributeKind::from_letter(letter)
                .ok_or_else(|| invalid(format!("unknown attribute letter '{letter}'")))?;
            let components = digit
                .to_digit(10)
                .ok_or_else(|| invalid(format!("'{digit}' is not a component count")))?;
            entries.push(LayoutEntry::new(kind, components as usize));
        }

        Layout::new(entries).map_err(|err| match err {
            ObjError::InvalidLayout { reason, .. } => invalid(reason),
            other => other,
        })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(&self.entries))
    }
}

fn describe(entries: &[LayoutEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}{}", e.kind.letter(), e.components))
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_layout() {
        let layout: Layout = "P3_T2_N3".parse().expect("valid layout");
        assert_eq!(
            layout.entries(),
            &[
                LayoutEntry::new(AttributeKind::Position, 3),
                LayoutEntry::new(AttributeKind::TexCoord, 2),
                LayoutEntry::new(AttributeKind::Normal, 3),
            ]
        );
        assert_eq!(layout.stride(), 8);
        assert_eq!(layout.to_string(), "P3_T2_N3");
    }

    #[test]
    fn order_is_preserved() {
        let layout: Layout = "N3_P2".parse().unwrap();
        assert_eq!(layout.entries()[0].kind, AttributeKind::Normal);
        assert_eq!(layout.entries()[1].kind, AttributeKind::Position);
        assert!(!layout.contains(AttributeKind::TexCoord));
    }

    #[test]
    fn rejects_malformed_layouts() {
        for bad in ["", "P", "P33", "X3", "P3__T2", "P0", "Pa", "P3_P2", "p3"] {
            let err = bad.parse::<Layout>().unwrap_err();
            assert!(
                matches!(err, ObjError::InvalidLayout { ref layout, .. } if layout == bad),
                "{bad:?} -> {err}"
            );
        }
    }

    #[test]
    fn new_rejects_duplicates() {
        let err = Layout::new(vec![
            LayoutEntry::new(AttributeKind::Normal, 3),
            LayoutEntry::new(AttributeKind::Normal, 2),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
