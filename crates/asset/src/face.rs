//! Face statements: corner references and triangulation.

use std::fmt;

/// One polygon corner, 0-based. Also the vertex identity used for indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Corner {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl Corner {
    pub const fn new(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// Triangle produced from one face line (`line` is 1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub line: usize,
    pub corners: [Corner; 3],
}

/// Lengths of the attribute lists at the point a face line is read.
/// Negative indices resolve against these.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListLengths {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
}

/// Why a face line was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaceError {
    TooFewCorners(usize),
    TooManyCorners(usize),
    BadCorner(String),
    ZeroIndex(String),
    RelativeOutOfRange(String),
}

impl fmt::Display for FaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewCorners(n) => write!(f, "face needs at least 3 corners, found {n}"),
            Self::TooManyCorners(n) => {
                write!(f, "polygons with {n} corners are not supported (triangles and quads only)")
            }
            Self::BadCorner(token) => write!(
                f,
                "corner '{token}' is not one of v, v/t, v/t/n, v//n"
            ),
            Self::ZeroIndex(token) => write!(f, "OBJ indices are 1-based; found 0 in '{token}'"),
            Self::RelativeOutOfRange(token) => {
                write!(f, "relative index in '{token}' points before the first element")
            }
        }
    }
}

/// Parse a single corner token (`v`, `v/t`, `v/t/n` or `v//n`).
pub fn parse_corner(token: &str, lengths: ListLengths) -> Result<Corner, FaceError> {
    let bad = || FaceError::BadCorner(token.to_owned());

    let mut parts = token.split('/');
    let pos = parts.next().ok_or_else(bad)?;
    let tex = parts.next();
    let norm = parts.next();
    if parts.next().is_some() {
        return Err(bad());
    }

    let (tex, norm) = match (tex, norm) {
        (None, None) => (None, None),
        (Some(t), None) if !t.is_empty() => (Some(t), None),
        (Some(t), Some(n)) if !n.is_empty() => ((!t.is_empty()).then_some(t), Some(n)),
        _ => return Err(bad()),
    };

    let position = resolve_index(pos, lengths.positions, token)?;
    let texcoord = tex
        .map(|t| resolve_index(t, lengths.texcoords, token))
        .transpose()?;
    let normal = norm
        .map(|n| resolve_index(n, lengths.normals, token))
        .transpose()?;

    Ok(Corner::new(position, texcoord, normal))
}

/// Turn a 1-based (or negative, relative) OBJ index into a 0-based one.
/// Positive indices are not bounds-checked here; forward references are
/// rejected once the whole file has been read.
fn resolve_index(raw: &str, len: usize, token: &str) -> Result<usize, FaceError> {
    if raw.starts_with('+') {
        return Err(FaceError::BadCorner(token.to_owned()));
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| FaceError::BadCorner(token.to_owned()))?;

    match value {
        0 => Err(FaceError::ZeroIndex(token.to_owned())),
        v if v > 0 => Ok((v - 1) as usize),
        v => {
            let back = v.unsigned_abs() as usize;
            len.checked_sub(back)
                .ok_or_else(|| FaceError::RelativeOutOfRange(token.to_owned()))
        }
    }
}

/// Parse the arguments of an `f` line into one triangle, or two for a quad.
///
/// A quad `a b c d` always becomes `(a, b, c)` followed by `(a, c, d)`.
/// Texcoord/normal presence is not checked per line; see `WavefrontParser`.
pub fn parse_face(args: &str, lengths: ListLengths) -> Result<Vec<[Corner; 3]>, FaceError> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    match tokens.len() {
        n if n < 3 => return Err(FaceError::TooFewCorners(n)),
        3 | 4 => {}
        n => return Err(FaceError::TooManyCorners(n)),
    }

    let corners = tokens
        .iter()
        .map(|token| parse_corner(token, lengths))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match corners[..] {
        [a, b, c] => vec![[a, b, c]],
        [a, b, c, d] => vec![[a, b, c], [a, c, d]],
        _ => unreachable!("corner count checked above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENGTHS: ListLengths = ListLengths {
        positions: 4,
        texcoords: 4,
        normals: 2,
    };

    #[test]
    fn corner_forms() {
        assert_eq!(parse_corner("3", LENGTHS), Ok(Corner::new(2, None, None)));
        assert_eq!(parse_corner("3/1", LENGTHS), Ok(Corner::new(2, Some(0), None)));
        assert_eq!(
            parse_corner("3/1/2", LENGTHS),
            Ok(Corner::new(2, Some(0), Some(1)))
        );
        assert_eq!(parse_corner("3//2", LENGTHS), Ok(Corner::new(2, None, Some(1))));
    }

    #[test]
    fn rejects_other_corner_shapes() {
        for bad in ["", "1/", "1//", "1/2/", "/1", "//1", "1/2/3/4", "a", "1.5", "+1", "1/x"] {
            assert_eq!(
                parse_corner(bad, LENGTHS),
                Err(FaceError::BadCorner(bad.to_owned())),
                "{bad:?}"
            );
        }
        assert_eq!(
            parse_corner("0/1", LENGTHS),
            Err(FaceError::ZeroIndex("0/1".into()))
        );
    }

    #[test]
    fn negative_indices_are_relative() {
        assert_eq!(
            parse_corner("-1/-1/-2", LENGTHS),
            Ok(Corner::new(3, Some(3), Some(0)))
        );
        assert_eq!(
            parse_corner("-5", LENGTHS),
            Err(FaceError::RelativeOutOfRange("-5".into()))
        );
    }

    #[test]
    fn quad_split_keeps_first_corner() {
        let tris = parse_face("1 2 3 4", LENGTHS).unwrap();
        let ids: Vec<[usize; 3]> = tris.into_iter().map(|t| t.map(|c| c.position)).collect();
        assert_eq!(ids, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn corner_count_limits() {
        assert_eq!(parse_face("1 2", LENGTHS), Err(FaceError::TooFewCorners(2)));
        assert_eq!(parse_face("", LENGTHS), Err(FaceError::TooFewCorners(0)));
        assert_eq!(
            parse_face("1 2 3 4 1", LENGTHS),
            Err(FaceError::TooManyCorners(5))
        );
    }

    #[test]
    fn mixed_corners_are_kept_for_finalisation() {
        let tris = parse_face("1/1 2 3/3", LENGTHS).expect("corners parse");
        assert_eq!(
            tris,
            vec![[
                Corner::new(0, Some(0), None),
                Corner::new(1, None, None),
                Corner::new(2, Some(2), None),
            ]]
        );
    }
}
