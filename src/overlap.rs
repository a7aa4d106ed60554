/// Removal of overlap between branch rectangles
///
/// Branch rectangles are not confined to the upper triangle, so every pair is
/// compared along four interval combinations: y against y, own y against the
/// other's x, x against y and x against x. Overlapping intervals are truncated
/// in favour of the branch carrying more writhe; fully nested intervals of the
/// losing branch are emptied. Emptied rectangles are only flagged, the caller
/// compacts the list afterwards.
use log::debug;

use crate::branch::{Branch, Rect, Span};
use crate::writhe_map::WritheMatrix;

/// How two overlapping intervals relate, `a` is the reference interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// the upper bound of `b` lies inside `a`, `b` starts no later than `a`
    Partial { first_is_a: bool },
    /// `b` lies strictly inside `a`
    Nested { first_is_a: bool },
}

fn classify(lim1: &Span, lim2: &Span) -> Option<Overlap> {
    if lim1.hi < lim2.lo || lim2.hi < lim1.lo {
        return None;
    }
    // checked in order of precedence
    if lim1.hi < lim2.hi && lim1.lo > lim2.lo {
        Some(Overlap::Nested { first_is_a: false })
    } else if lim2.hi < lim1.hi && lim2.lo > lim1.lo {
        Some(Overlap::Nested { first_is_a: true })
    } else if lim2.lo <= lim1.hi && lim1.hi <= lim2.hi && lim1.lo <= lim2.lo {
        Some(Overlap::Partial { first_is_a: false })
    } else if lim1.lo <= lim2.hi && lim2.hi <= lim1.hi && lim2.lo <= lim1.lo {
        Some(Overlap::Partial { first_is_a: true })
    } else {
        None
    }
}

/// Resolve overlap between `lim1` and `lim2`; `rows*` are the partner intervals
/// spanning the writhe-map rows each interval is weighted with.
fn resolve_interval_pair(
    wm: &WritheMatrix,
    rows1: Span,
    rows2: Span,
    lim1: &mut Span,
    lim2: &mut Span,
) {
    let Some(overlap) = classify(lim1, lim2) else {
        return;
    };
    let first_is_a = match overlap {
        Overlap::Partial { first_is_a } | Overlap::Nested { first_is_a } => first_is_a,
    };
    // `lim1` belongs to the earlier rectangle, which keeps its interval on a tie
    let a_wins = |wra: f64, wrb: f64| wra > wrb || (wra == wrb && first_is_a);
    let (rows_a, lim_a, rows_b, lim_b) = if first_is_a {
        (rows1, lim1, rows2, lim2)
    } else {
        (rows2, lim2, rows1, lim1)
    };

    match overlap {
        Overlap::Partial { .. } => {
            // writhe compared over the shared interval only
            let (lo, hi) = (lim_a.lo, lim_b.hi);
            let wra = wm.box_sum(rows_a.lo, rows_a.hi, lo, hi);
            let wrb = wm.box_sum(rows_b.lo, rows_b.hi, lo, hi);
            if a_wins(wra, wrb) {
                lim_b.hi = lo - 1;
            } else {
                lim_a.lo = hi + 1;
            }
        }
        Overlap::Nested { .. } => {
            let wra = wm.box_sum(rows_a.lo, rows_a.hi, lim_a.lo, lim_a.hi);
            let wrb = wm.box_sum(rows_b.lo, rows_b.hi, lim_b.lo, lim_b.hi);
            if a_wins(wra, wrb) {
                lim_b.hi = lim_b.lo - 1;
            } else {
                lim_a.hi = lim_a.lo - 1;
            }
        }
    }
}

fn resolve_rect_pair(wm: &WritheMatrix, a: &mut Rect, b: &mut Rect) {
    resolve_interval_pair(wm, a.x, b.x, &mut a.y, &mut b.y);
    resolve_interval_pair(wm, a.y, b.x, &mut a.x, &mut b.y);
    resolve_interval_pair(wm, a.x, b.y, &mut a.y, &mut b.x);
    resolve_interval_pair(wm, a.y, b.y, &mut a.x, &mut b.x);
}

/// Truncate overlapping rectangles in place
///
/// Pairs are visited in index order. On equal writhe the rectangle listed first
/// wins. Rectangles left with an empty interval are invalid afterwards.
pub fn resolve_overlap(wm: &WritheMatrix, rects: &mut [Rect]) {
    let n = rects.len();
    for i in 0..n.saturating_sub(1) {
        if rects[i].y.is_empty() {
            continue;
        }
        for j in (i + 1)..n {
            if rects[j].y.is_empty() {
                continue;
            }
            let (head, tail) = rects.split_at_mut(j);
            resolve_rect_pair(wm, &mut head[i], &mut tail[0]);
        }
    }
}

/// Run [`resolve_overlap`] on the live branches and commit the result
///
/// Returns the number of branches flagged as dead.
pub fn remove_branch_overlap(wm: &WritheMatrix, branches: &mut [Branch]) -> usize {
    let live: Vec<usize> = (0..branches.len()).filter(|&k| branches[k].live).collect();
    let mut work: Vec<Rect> = live.iter().map(|&k| branches[k].rect).collect();
    resolve_overlap(wm, &mut work);

    let mut flagged = 0;
    for (&k, rect) in live.iter().zip(work) {
        branches[k].rect = rect;
        if !rect.is_valid() {
            branches[k].kill();
            flagged += 1;
        }
    }
    debug!("overlap removal flagged {flagged} of {} branches", live.len());
    flagged
}
