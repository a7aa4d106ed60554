/// Final plectoneme definition from combined candidates
use log::debug;

use crate::branch::Rect;
use crate::combine::Composite;
use crate::overlap::resolve_overlap;
use crate::pairs::wr2dens_factor;
use crate::writhe_map::WritheMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct Plectoneme {
    pub entry: usize,
    pub exit: usize,
    pub writhe_density: f64,
    pub writhe: f64,
    pub num_segs: usize,
    pub length: f64,
    /// Index of the composite this plectoneme was defined from
    pub composite: usize,
}

/// Thresholds applied to candidate plectonemes
#[derive(Debug, Clone, Copy)]
pub struct PlecThresholds {
    pub min_writhe_density: f64,
    pub min_writhe: f64,
    pub disc_len: f64,
    pub om0: f64,
}

/// Resolve overlap among candidates and keep the ones clearing both thresholds
pub fn define_plecs(
    wm: &WritheMatrix,
    composites: &[Composite],
    thresholds: &PlecThresholds,
) -> Vec<Plectoneme> {
    let factor = wr2dens_factor(thresholds.om0);

    let mut candidates: Vec<Rect> = composites
        .iter()
        .map(|c| {
            let (entry, exit) = (c.rect.entry(), c.rect.exit());
            Rect::new(entry, exit, entry, exit)
        })
        .collect();
    resolve_overlap(wm, &mut candidates);

    let mut plecs = Vec::new();
    for (k, cand) in candidates.iter().enumerate() {
        if !cand.is_valid() {
            continue;
        }
        let wr = cand.writhe(wm);
        let num_segs = cand.x.len();
        let length = num_segs as f64 * thresholds.disc_len;
        if length <= 0.0 {
            continue;
        }
        let density = factor * wr / length;
        if density < thresholds.min_writhe_density || wr < thresholds.min_writhe {
            continue;
        }
        plecs.push(Plectoneme {
            entry: cand.x.lo as usize,
            exit: cand.x.hi as usize,
            writhe_density: density,
            writhe: wr,
            num_segs: num_segs as usize,
            length,
            composite: k,
        });
    }
    debug!(
        "{} of {} candidates defined as plectonemes",
        plecs.len(),
        candidates.len()
    );
    plecs
}
