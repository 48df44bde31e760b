//! objview: load a Wavefront OBJ and inspect the arrays a renderer would get.

use anyhow::{Context, Result};
use asset::{AttributeKind, Layout, WavefrontParser};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Parse counts and diagnostics only.
    Stats,
    /// One record per face corner.
    Flat,
    /// Deduplicated records + index buffer.
    Indexed,
}

/// Available inspection modes, looked up by `--mode=` name.
const MODES: &[(&str, Mode)] = &[
    ("stats", Mode::Stats),
    ("flat", Mode::Flat),
    ("indexed", Mode::Indexed),
];

struct Options {
    obj: String,
    layout: String,
    mode: Mode,
    verbose: bool,
    dump: bool,
}

fn parse_args() -> Options {
    let mut opts = Options {
        obj: "assets/cube.obj".to_owned(),
        layout: "P3_T2".to_owned(),
        mode: Mode::Stats,
        verbose: false,
        dump: false,
    };

    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--obj=") {
            opts.obj = v.to_owned();
        } else if let Some(v) = arg.strip_prefix("--layout=") {
            opts.layout = v.to_owned();
        } else if let Some(v) = arg.strip_prefix("--mode=") {
            let name = v.to_ascii_lowercase();
            match MODES.iter().find(|(n, _)| *n == name) {
                Some(&(_, mode)) => opts.mode = mode,
                None => log::warn!("Unknown mode '{}', falling back to stats.", v),
            }
        } else if arg == "--verbose" || arg == "-v" {
            opts.verbose = true;
        } else if arg == "--dump" {
            opts.dump = true;
        } else {
            log::warn!("Ignoring unknown argument '{}'", arg);
        }
    }
    opts
}

fn available(obj: &WavefrontParser, kind: AttributeKind) -> &'static str {
    if obj.has(kind) { "available" } else { "missing" }
}

fn print_rows<'a>(rows: impl Iterator<Item = &'a [f32]>) {
    for (i, row) in rows.enumerate() {
        let cols: Vec<String> = row.iter().map(|v| format!("{v:>9.4}")).collect();
        println!("{i:>6}: {}", cols.join(" "));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args();
    let obj = WavefrontParser::from_path(&opts.obj, opts.verbose)
        .with_context(|| format!("Failed to load mesh {}", opts.obj))?;

    log::info!(
        "Loaded {}: {} positions, {} texcoords, {} normals, {} triangles",
        obj.origin(),
        obj.positions().len(),
        obj.texcoords().len(),
        obj.normals().len(),
        obj.triangle_count()
    );
    let skipped = obj.diagnostics().iter().filter(|d| d.kind.is_skip()).count();
    if skipped > 0 {
        log::warn!(
            "{} line(s) skipped, {} diagnostic(s) total (rerun with --verbose to list them)",
            skipped,
            obj.diagnostics().len()
        );
    }

    let layout: Layout = opts
        .layout
        .parse()
        .with_context(|| format!("Bad --layout value '{}'", opts.layout))?;
    if !layout.contains(AttributeKind::Position) {
        log::warn!("Layout {} has no position slot", layout);
    }

    match opts.mode {
        Mode::Stats => {
            for kind in AttributeKind::ALL {
                println!("{:>18}: {}", kind.to_string(), available(&obj, kind));
            }
            for d in obj.diagnostics() {
                println!("line {:>5}: {} ('{}')", d.line, d.kind, d.text);
            }
        }
        Mode::Flat => {
            let flat = obj.as_flat(&layout).context("Failed to build flat arrays")?;
            log::info!(
                "Flat {}: {} records x {} floats ({} bytes)",
                layout,
                flat.len(),
                flat.stride(),
                flat.as_bytes().len()
            );
            if opts.dump {
                print_rows(flat.rows());
            }
        }
        Mode::Indexed => {
            let mesh = obj
                .as_indexed(&layout)
                .context("Failed to build indexed arrays")?;
            log::info!(
                "Indexed {}: {} unique records x {} floats, {} indices ({} + {} bytes)",
                layout,
                mesh.vertices.len(),
                mesh.vertices.stride(),
                mesh.indices.len(),
                mesh.vertices.as_bytes().len(),
                mesh.index_bytes().len()
            );
            if opts.dump {
                print_rows(mesh.vertices.rows());
                for tri in mesh.indices.chunks(3) {
                    println!("{tri:?}");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_are_unique() {
        for (i, (name, _)) in MODES.iter().enumerate() {
            assert!(MODES[i + 1..].iter().all(|(other, _)| other != name));
        }
        assert!(MODES.iter().any(|&(_, m)| m == Mode::Indexed));
    }

    #[test]
    fn bundled_cube_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/cube.obj");
        let obj = WavefrontParser::from_path(path, false).expect("bundled cube parses");
        assert_eq!(obj.triangle_count(), 12);
        assert!(obj.diagnostics().iter().all(|d| !d.kind.is_skip()));

        let layout: Layout = "P3_T2_N3".parse().unwrap();
        let mesh = obj.as_indexed(&layout).unwrap();
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.expand(), Some(obj.as_flat(&layout).unwrap()));

        for kind in AttributeKind::ALL {
            assert!(layout.contains(kind));
            assert_eq!(available(&obj, kind), "available");
        }
    }
}
