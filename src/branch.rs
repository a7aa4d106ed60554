/// Branch rectangles of the writhe map
///
/// A branch covers the index box `[x1, x2] x [y1, y2]`. Resolver passes never
/// remove branches; they clear the `live` flag and the list is compacted with
/// [`compact`] once a pass is complete.
use log::debug;

use crate::pairs::wr2dens_factor;
use crate::tracer::{Tracer, TracerPoint};
use crate::writhe_map::WritheMatrix;

/// Inclusive index interval; `hi < lo` marks an emptied interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub lo: i64,
    pub hi: i64,
}

impl Span {
    pub fn new(lo: i64, hi: i64) -> Self {
        Span { lo, hi }
    }

    pub fn is_empty(&self) -> bool {
        self.hi < self.lo
    }

    pub fn len(&self) -> i64 {
        self.hi - self.lo + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: Span,
    pub y: Span,
}

impl Rect {
    pub fn new(x1: i64, x2: i64, y1: i64, y2: i64) -> Self {
        Rect {
            x: Span::new(x1, x2),
            y: Span::new(y1, y2),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.x.is_empty() && !self.y.is_empty()
    }

    /// Entrance index of the loop
    pub fn entry(&self) -> i64 {
        self.x.lo
    }

    /// Exit index of the loop
    pub fn exit(&self) -> i64 {
        self.y.hi
    }

    /// Writhe-map sum over the rectangle (one triangle only)
    pub fn writhe(&self, wm: &WritheMatrix) -> f64 {
        wm.box_sum(self.x.lo, self.x.hi, self.y.lo, self.y.hi)
    }
}

/// True if both `b1` and `b2` lie within `[a1, a2]`
pub fn is_downstream(a1: i64, a2: i64, b1: i64, b2: i64) -> bool {
    (a1..=a2).contains(&b1) && (a1..=a2).contains(&b2)
}

/// A promoted tracer together with its band
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub rect: Rect,
    pub band: Vec<TracerPoint>,
    pub live: bool,
}

impl Branch {
    pub fn kill(&mut self) {
        self.live = false;
    }
}

/// Promote tracers whose box writhe density reaches `min_writhe_density`
pub fn classify_tracers(
    wm: &WritheMatrix,
    tracers: &[Tracer],
    min_writhe_density: f64,
    disc_len: f64,
    om0: f64,
) -> Vec<Branch> {
    let factor = wr2dens_factor(om0);
    let mut branches = Vec::new();
    for tracer in tracers {
        let rect = Rect::new(
            tracer.x_extent[0] as i64,
            tracer.x_extent[1] as i64,
            tracer.y_extent[0] as i64,
            tracer.y_extent[1] as i64,
        );
        let wr = 2.0 * rect.writhe(wm);
        let plec_len = tracer.x_span().max(tracer.y_span()) as f64 * disc_len;
        let density = factor * wr / plec_len;
        if density < min_writhe_density {
            continue;
        }
        branches.push(Branch {
            rect,
            band: tracer.band(),
            live: true,
        });
    }
    debug!(
        "promoted {} of {} tracers to branches",
        branches.len(),
        tracers.len()
    );
    branches
}

/// Drop branches flagged during the last pass
pub fn compact(branches: Vec<Branch>) -> Vec<Branch> {
    branches.into_iter().filter(|b| b.live).collect()
}
