/// Plain-text chain configurations
///
/// One point per line as three whitespace separated coordinates. Blank lines
/// separate consecutive configurations (frames); `#` starts a comment.
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::geometry::Point3;

/// Read all configurations stored in `path`
pub fn read_conformations<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Point3>>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_conformations(BufReader::new(file))
        .with_context(|| format!("reading {}", path.display()))
}

pub fn parse_conformations<R: BufRead>(reader: R) -> Result<Vec<Vec<Point3>>> {
    let mut frames = Vec::new();
    let mut current: Vec<Point3> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            // comment-only lines do not close a frame
            if line.trim().is_empty() && !current.is_empty() {
                frames.push(std::mem::take(&mut current));
            }
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != 3 {
            bail!(
                "line {}: expected 3 coordinates, found {}",
                lineno + 1,
                fields.len()
            );
        }
        let mut point = [0.0; 3];
        for (slot, field) in point.iter_mut().zip(&fields) {
            *slot = field
                .parse::<f64>()
                .with_context(|| format!("line {}: invalid coordinate '{field}'", lineno + 1))?;
        }
        current.push(point);
    }
    if !current.is_empty() {
        frames.push(current);
    }
    Ok(frames)
}
