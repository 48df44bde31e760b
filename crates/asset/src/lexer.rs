//! Line classification and numeric token scanning for OBJ text.

/// Kind of an OBJ statement, decided by its leading token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    Position,
    TexCoord,
    Normal,
    Face,
    Unrecognized(&'a str),
}

/// Drop everything from the first `#` to the end of the line.
#[inline]
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Split a comment-free line into its kind and the remaining arguments.
/// Returns `None` for blank lines.
pub fn classify(line: &str) -> Option<(LineKind<'_>, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (tag, rest) = match line.find(char::is_whitespace) {
        Some(at) => (&line[..at], line[at..].trim_start()),
        None => (line, ""),
    };

    let kind = match tag {
        "v" => LineKind::Position,
        "vt" => LineKind::TexCoord,
        "vn" => LineKind::Normal,
        "f" => LineKind::Face,
        other => LineKind::Unrecognized(other),
    };
    Some((kind, rest))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Start,
    Sign,
    Int,
    LeadingDot,
    Frac,
    Exp,
    ExpSign,
    ExpInt,
}

/// Parse a plain decimal literal: `[+-]? (d+ (. d*)? | . d+) ([eE] [+-]? d+)?`.
///
/// Unlike `str::parse::<f32>` this refuses `inf`, `nan` and friends,
/// including literals that overflow `f32`.
pub fn scan_decimal(token: &str) -> Option<f32> {
    let mut state = Scan::Start;
    for byte in token.bytes() {
        state = match (state, byte) {
            (Scan::Start, b'+' | b'-') => Scan::Sign,
            (Scan::Start | Scan::Sign | Scan::Int, b'0'..=b'9') => Scan::Int,
            (Scan::Start | Scan::Sign, b'.') => Scan::LeadingDot,
            (Scan::Int, b'.') => Scan::Frac,
            (Scan::LeadingDot | Scan::Frac, b'0'..=b'9') => Scan::Frac,
            (Scan::Int | Scan::Frac, b'e' | b'E') => Scan::Exp,
            (Scan::Exp, b'+' | b'-') => Scan::ExpSign,
            (Scan::Exp | Scan::ExpSign | Scan::ExpInt, b'0'..=b'9') => Scan::ExpInt,
            _ => return None,
        };
    }

    match state {
        Scan::Int | Scan::Frac | Scan::ExpInt => {
            token.parse().ok().filter(|v: &f32| v.is_finite())
        }
        _ => None,
    }
}

/// Take up to `limit` leading decimal literals; scanning for values stops at
/// the first token that is not one, so later numbers never shift into its slot.
/// Every rejected token on the line comes back in the second vector.
pub fn extract_floats(args: &str, limit: usize) -> (Vec<f32>, Vec<&str>) {
    let mut values = Vec::new();
    let mut rejected = Vec::new();
    let mut leading = true;
    for token in args.split_whitespace() {
        match scan_decimal(token) {
            Some(value) if leading && values.len() < limit => values.push(value),
            Some(_) => {}
            None => {
                leading = false;
                rejected.push(token);
            }
        }
    }
    (values, rejected)
}
