/// Writhe map of a discretized chain
///
/// The matrix holds the pairwise writhe contributions of the chain segments.
/// Rows and columns of the two terminal segments are zeroed on construction so
/// that no detection stage ever picks them up.
use anyhow::{bail, Result};
use ndarray::{s, Array2, ArrayView1};
use rayon::prelude::*;
use std::f64::consts::PI;

use crate::geometry::{cross, dot, normalized, sub, Point3};

/// Smallest matrix that still has interior rows after boundary zeroing
pub const MIN_SEGMENTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct WritheMatrix {
    data: Array2<f64>,
}

impl WritheMatrix {
    /// Wrap a square matrix, zeroing the boundary rows and columns
    pub fn from_array(mut data: Array2<f64>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            bail!("writhe matrix must be square, got {rows}x{cols}");
        }
        if rows < MIN_SEGMENTS {
            bail!("writhe matrix needs at least {MIN_SEGMENTS} segments, got {rows}");
        }
        if data.iter().any(|v| !v.is_finite()) {
            bail!("writhe matrix contains non-finite entries");
        }
        let last = rows - 1;
        data.row_mut(0).fill(0.0);
        data.row_mut(last).fill(0.0);
        data.column_mut(0).fill(0.0);
        data.column_mut(last).fill(0.0);
        Ok(WritheMatrix { data })
    }

    /// Build from nested row vectors
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                bail!("row {i} has {} entries, expected {n}", row.len());
            }
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((n, n), flat)?;
        Self::from_array(data)
    }

    /// Number of segments
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    pub fn row_sum(&self, i: usize) -> f64 {
        self.data.row(i).sum()
    }

    /// Total writhe of the configuration
    pub fn total(&self) -> f64 {
        self.data.sum()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.outer_iter().map(|r| r.to_vec()).collect()
    }

    /// Sum over the inclusive index box `[r1, r2] x [c1, c2]`
    ///
    /// Bounds are clamped to the matrix; reversed bounds give an empty box.
    pub fn box_sum(&self, r1: i64, r2: i64, c1: i64, c2: i64) -> f64 {
        let last = self.size() as i64 - 1;
        let (r1, r2) = (r1.max(0), r2.min(last));
        let (c1, c2) = (c1.max(0), c2.min(last));
        if r2 < r1 || c2 < c1 {
            return 0.0;
        }
        self.data
            .slice(s![r1 as usize..=r2 as usize, c1 as usize..=c2 as usize])
            .sum()
    }

    /// Copy with the sign flipped such that the net writhe is non-negative
    ///
    /// Negatively supercoiled configurations are traced the same way as
    /// positive ones. A zero mean keeps the matrix as is.
    pub fn oriented(&self) -> WritheMatrix {
        let mean = self.data.mean().unwrap_or(0.0);
        if mean < 0.0 {
            WritheMatrix {
                data: -&self.data,
            }
        } else {
            self.clone()
        }
    }
}

/// Provider of writhe maps for chain configurations
pub trait WritheMapper: Sync {
    fn writhe_map(&self, conf: &[Point3]) -> Result<WritheMatrix>;
}

/// Exact segment-pair writhe after Klenin & Langowski (2000)
///
/// For an open chain of `P` points the map covers the `P - 1` segments. Each
/// entry is the signed solid angle of the segment pair divided by `4π`, so the
/// full matrix sums to the writhe of the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentWritheMapper;

impl SegmentWritheMapper {
    pub fn new() -> Self {
        SegmentWritheMapper
    }
}

impl WritheMapper for SegmentWritheMapper {
    fn writhe_map(&self, conf: &[Point3]) -> Result<WritheMatrix> {
        if conf.len() < 2 {
            bail!("configuration needs at least 2 points, got {}", conf.len());
        }
        if conf.iter().flatten().any(|v| !v.is_finite()) {
            bail!("configuration contains non-finite coordinates");
        }
        let n = conf.len() - 1;
        if n < MIN_SEGMENTS {
            bail!(
                "configuration has {n} segments, at least {MIN_SEGMENTS} are required"
            );
        }

        // Upper triangle per row, mirrored afterwards
        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 2)..n)
                    .map(|j| segment_pair_writhe(&conf[i], &conf[i + 1], &conf[j], &conf[j + 1]))
                    .collect()
            })
            .collect();

        let mut data = Array2::<f64>::zeros((n, n));
        for (i, row) in upper.iter().enumerate() {
            for (k, &w) in row.iter().enumerate() {
                let j = i + 2 + k;
                data[[i, j]] = w;
                data[[j, i]] = w;
            }
        }
        WritheMatrix::from_array(data)
    }
}

/// Writhe contribution of segments `p1 -> p2` and `p3 -> p4`
fn segment_pair_writhe(p1: &Point3, p2: &Point3, p3: &Point3, p4: &Point3) -> f64 {
    let r12 = sub(p2, p1);
    let r34 = sub(p4, p3);
    let r13 = sub(p3, p1);
    let r14 = sub(p4, p1);
    let r23 = sub(p3, p2);
    let r24 = sub(p4, p2);

    let faces = [
        normalized(&cross(&r13, &r14)),
        normalized(&cross(&r14, &r24)),
        normalized(&cross(&r24, &r23)),
        normalized(&cross(&r23, &r13)),
    ];
    let [Some(n1), Some(n2), Some(n3), Some(n4)] = faces else {
        return 0.0;
    };

    let omega: f64 = [(n1, n2), (n2, n3), (n3, n4), (n4, n1)]
        .iter()
        .map(|(a, b)| dot(a, b).clamp(-1.0, 1.0).asin())
        .sum();

    let orientation = dot(&cross(&r34, &r12), &r13);
    if orientation == 0.0 {
        return 0.0;
    }
    omega * orientation.signum() / (4.0 * PI)
}
