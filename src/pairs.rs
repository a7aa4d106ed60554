/// Detection of interacting segment pairs
///
/// Every interior row whose summed writhe exceeds the per-segment threshold
/// contributes one candidate pair: the row index and the column holding the
/// largest writhe entry of that row.
use std::f64::consts::PI;

use crate::writhe_map::WritheMatrix;

/// Candidate interaction between segments `x` and `y` (canonical, `x <= y`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    pub x: usize,
    pub y: usize,
    pub row_sum: f64,
    pub weight: f64,
}

/// Conversion factor between writhe per length and writhe density
pub fn wr2dens_factor(om0: f64) -> f64 {
    2.0 * PI / om0
}

/// Writhe a single segment has to carry to reach `min_writhe_density`
pub fn min_writhe_per_segment(min_writhe_density: f64, disc_len: f64, om0: f64) -> f64 {
    disc_len * min_writhe_density / wr2dens_factor(om0)
}

/// Collect canonical candidate pairs sorted by their first index
pub fn find_pairs(wm: &WritheMatrix, min_wr_per_seg: f64) -> Vec<Pair> {
    let n = wm.size();
    let mut pairs = Vec::new();
    for i in 1..n - 1 {
        let row = wm.row(i);
        let row_sum = row.sum();
        if row_sum <= min_wr_per_seg {
            continue;
        }
        // first maximum among interior columns
        let mut j_max = 1;
        for j in 2..n - 1 {
            if row[j] > row[j_max] {
                j_max = j;
            }
        }
        let (x, y) = if j_max < i { (j_max, i) } else { (i, j_max) };
        pairs.push(Pair {
            x,
            y,
            row_sum,
            weight: 2.0 * row[j_max],
        });
    }
    // stable, rows were visited in ascending order
    pairs.sort_by_key(|p| p.x);
    pairs
}
