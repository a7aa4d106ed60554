/// Combination of nested branches into plectoneme candidates
use log::debug;

use crate::branch::{is_downstream, Branch, Rect};
use crate::writhe_map::WritheMatrix;

/// Provisional merged plectoneme extent and the branches it absorbed
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub rect: Rect,
    /// Indices into the branch list, in insertion order
    pub branch_ids: Vec<usize>,
}

impl Composite {
    fn absorb_bounds(&mut self, other: &Rect) {
        self.rect.x.hi = self.rect.x.hi.max(other.x.hi);
        self.rect.y.lo = self.rect.y.lo.min(other.y.lo);
    }
}

/// Whether the loop `[b1, b2]` downstream of `[a1, a2]` is connected to it
///
/// The writhe in the three regions reaching around from the outer loop to the
/// inner one is averaged over the larger of the two gaps and compared against
/// the per-segment threshold.
pub fn can_connect_downstream(
    wm: &WritheMatrix,
    a1: i64,
    a2: i64,
    b1: i64,
    b2: i64,
    min_wr_per_seg: f64,
) -> bool {
    if !is_downstream(a1, a2, b1, b2) {
        return false;
    }
    let last = wm.size() as i64 - 1;
    let wr = wm.box_sum(a1, b1 - 1, b2 + 1, a2)
        + wm.box_sum(a1, b1 - 1, 0, b2)
        + wm.box_sum(b1, last, b2 + 1, a2);

    let num_segs = (b1 - a1).max(a2 - b2);
    if num_segs == 0 {
        return wr > 0.0;
    }
    wr / num_segs as f64 > min_wr_per_seg
}

/// Merge downstream branches into composites, walking branches in order
pub fn combine_branches(
    wm: &WritheMatrix,
    branches: &[Branch],
    min_wr_per_seg: f64,
) -> Vec<Composite> {
    let mut composites: Vec<Composite> = Vec::new();
    for (i, branch) in branches.iter().enumerate() {
        let p1 = branch.rect.entry();
        let p2 = branch.rect.exit();

        let host = composites
            .iter_mut()
            .find(|c| is_downstream(c.rect.entry(), c.rect.exit(), p1, p2));
        let Some(composite) = host else {
            composites.push(Composite {
                rect: branch.rect,
                branch_ids: vec![i],
            });
            continue;
        };

        composite.branch_ids.push(i);
        let (a1, a2) = (composite.rect.entry(), composite.rect.exit());
        let (b1, b2) = (composite.rect.x.hi, composite.rect.y.lo);
        if is_downstream(b1, b2, p1, p2) {
            // genuine sub-branch, merge only across a connected gap
            if can_connect_downstream(wm, a1, a2, p1, p2, min_wr_per_seg) {
                composite.absorb_bounds(&branch.rect);
            } else if branch.rect.writhe(wm) > composite.rect.writhe(wm) {
                composite.rect = branch.rect;
            }
        } else {
            composite.absorb_bounds(&branch.rect);
        }
    }
    debug!(
        "combined {} branches into {} candidates",
        branches.len(),
        composites.len()
    );
    composites
}
