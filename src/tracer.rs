/// Chaining of candidate pairs into tracers
///
/// Pairs are visited in ascending `x`. Each pair either extends an open tracer
/// that ends within `connect_segs` of it on both strands or opens a new one.
use crate::pairs::Pair;

/// Width of a stored pair record (x, y, row sum, weight, flag)
///
/// Tracer matching ranks candidates against this width instead of against the
/// running pair count of the best match so far.
const PAIR_RECORD_WIDTH: usize = 5;

/// Connected contour of candidate pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Tracer {
    pub pairs: Vec<Pair>,
    pub x_extent: [usize; 2],
    pub y_extent: [usize; 2],
}

/// One point of a tracer band; `y` is fractional inside interpolated gaps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerPoint {
    pub x: usize,
    pub y: f64,
}

/// Number of segments spanned by `connect_dist`
pub fn connect_segments(connect_dist: f64, disc_len: f64) -> usize {
    (connect_dist / disc_len).ceil().max(0.0) as usize
}

impl Tracer {
    fn start(pair: Pair) -> Self {
        Tracer {
            x_extent: [pair.x, pair.x],
            y_extent: [pair.y, pair.y],
            pairs: vec![pair],
        }
    }

    fn accepts(&self, pair: &Pair, connect_segs: usize) -> bool {
        if pair.x > self.x_extent[1].saturating_add(connect_segs) {
            return false;
        }
        let [y1, y2] = self.y_extent;
        y1.abs_diff(pair.y) <= connect_segs
            || pair.y.abs_diff(y2) <= connect_segs
            || (y1 <= pair.y && pair.y <= y2)
    }

    fn extend(&mut self, pair: Pair) {
        self.x_extent[1] = pair.x;
        self.y_extent[0] = self.y_extent[0].min(pair.y);
        self.y_extent[1] = self.y_extent[1].max(pair.y);
        self.pairs.push(pair);
    }

    pub fn x_span(&self) -> usize {
        self.x_extent[1] - self.x_extent[0] + 1
    }

    pub fn y_span(&self) -> usize {
        self.y_extent[1] - self.y_extent[0] + 1
    }

    /// Representative partner index for every `x` in the x-extent
    ///
    /// Where several pairs share an `x` the one with the largest weight wins.
    /// Missing endpoints fall back to the y-extent (entry to its upper bound,
    /// exit to its lower bound); interior gaps are interpolated linearly.
    pub fn band(&self) -> Vec<TracerPoint> {
        let [x1, x2] = self.x_extent;
        let mut ys: Vec<Option<f64>> = (x1..=x2)
            .map(|x| {
                let mut best: Option<&Pair> = None;
                for p in self.pairs.iter().filter(|p| p.x == x) {
                    if best.map_or(true, |b| p.weight > b.weight) {
                        best = Some(p);
                    }
                }
                best.map(|p| p.y as f64)
            })
            .collect();

        let last = ys.len() - 1;
        if ys[0].is_none() {
            ys[0] = Some(self.y_extent[1] as f64);
        }
        if ys[last].is_none() {
            ys[last] = Some(self.y_extent[0] as f64);
        }

        let known: Vec<usize> = (0..ys.len()).filter(|&k| ys[k].is_some()).collect();
        for w in known.windows(2) {
            let (a, b) = (w[0], w[1]);
            if b <= a + 1 {
                continue;
            }
            let (Some(v1), Some(v2)) = (ys[a], ys[b]) else {
                continue;
            };
            let num = (b - a) as f64;
            let dv = (v2 - v1) / num;
            for ip in 1..(b - a) {
                ys[a + ip] = Some(v1 + ip as f64 * dv);
            }
        }

        ys.into_iter()
            .enumerate()
            .map(|(k, y)| TracerPoint {
                x: x1 + k,
                y: y.unwrap_or(f64::NAN),
            })
            .collect()
    }
}

/// Chain sorted candidate pairs into tracers
pub fn build_tracers(pairs: &[Pair], connect_segs: usize) -> Vec<Tracer> {
    let mut tracers: Vec<Tracer> = Vec::new();
    for pair in pairs {
        let mut best: Option<usize> = None;
        let mut best_len = 0;
        for (k, tracer) in tracers.iter().enumerate() {
            if !tracer.accepts(pair, connect_segs) {
                continue;
            }
            if tracer.pairs.len() > best_len {
                best = Some(k);
                best_len = PAIR_RECORD_WIDTH;
            }
        }
        match best {
            Some(k) => tracers[k].extend(*pair),
            None => tracers.push(Tracer::start(*pair)),
        }
    }
    tracers
}
