/// Property-based tests for the detection pipeline
///
/// Uses proptest to check invariants that must hold for any writhe map,
/// not only for the hand-built loop signatures of the scenario tests.
use ndarray::Array2;
use plecfinder::branch::{compact, Branch, Rect, Span};
use plecfinder::conflict::resolve_conflicts;
use plecfinder::geometry::{disc_len, Point3};
use plecfinder::overlap::{remove_branch_overlap, resolve_overlap};
use plecfinder::{FinderConfig, PlecFinder, SegmentWritheMapper, WritheMapper, WritheMatrix};
use proptest::prelude::*;
use std::f64::consts::PI;

/// Symmetric matrix from the upper triangle entries
fn symmetric(n: usize, values: &[f64]) -> WritheMatrix {
    let mut data = Array2::zeros((n, n));
    let mut k = 0;
    for i in 0..n {
        for j in i..n {
            data[[i, j]] = values[k % values.len()];
            data[[j, i]] = values[k % values.len()];
            k += 1;
        }
    }
    WritheMatrix::from_array(data).unwrap()
}

fn random_map() -> impl Strategy<Value = WritheMatrix> {
    (6usize..40, prop::collection::vec(-0.2f64..0.2, 32..256))
        .prop_map(|(n, values)| symmetric(n, &values))
}

fn random_span(max: i64) -> impl Strategy<Value = Span> {
    (1..max, 0i64..12).prop_map(move |(lo, len)| Span::new(lo, (lo + len).min(max)))
}

fn contains(outer: &Span, inner: &Span) -> bool {
    inner.is_empty() || (outer.lo <= inner.lo && inner.hi <= outer.hi)
}

/// Property: reported plectonemes are well formed and clear both thresholds
#[test]
fn prop_plectonemes_are_well_formed() {
    proptest!(|(
        wm in random_map(),
        min_wd in 0.0f64..0.5,
        min_wr in 0.0f64..1.0,
        disc in 0.2f64..2.0
    )| {
        let finder = PlecFinder::new(FinderConfig::new(min_wd, min_wr));
        let topo = finder.find_in_matrix(&wm, disc).unwrap();
        let n = wm.size();

        prop_assert_eq!(topo.n, n);
        prop_assert_eq!(topo.num_plecs, topo.plecs.len());
        prop_assert_eq!(topo.num_branches, topo.branches.len());
        prop_assert_eq!(topo.num_tracers, topo.num_branches);
        let factor = 2.0 * PI / FinderConfig::DEFAULT_OM0;
        for plec in &topo.plecs {
            prop_assert!(plec.id1 >= 1 && plec.id1 <= plec.id2 && plec.id2 <= n - 2);
            prop_assert_eq!(plec.num_segs, plec.id2 - plec.id1 + 1);
            prop_assert!(plec.wr >= min_wr);
            prop_assert!(plec.wrdens >= min_wd);
            let expected = factor * plec.wr / (plec.num_segs as f64 * disc);
            prop_assert!((plec.wrdens - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            prop_assert!(plec.branch_ids.iter().all(|&id| id < topo.num_branches));
        }
    });
}

/// Property: the handedness of the map does not change the plectonemes
#[test]
fn prop_detection_is_sign_invariant() {
    proptest!(|(wm in random_map())| {
        let finder = PlecFinder::new(FinderConfig::new(0.05, 0.1));
        let flipped = WritheMatrix::from_array(-wm.as_array().clone()).unwrap();
        let a = finder.find_in_matrix(&wm, 1.0).unwrap();
        let b = finder.find_in_matrix(&flipped, 1.0).unwrap();
        prop_assert_eq!(a.plecs, b.plecs);
    });
}

/// Property: overlap removal only ever shrinks intervals
#[test]
fn prop_overlap_removal_shrinks() {
    proptest!(|(
        spans in prop::collection::vec((random_span(30), random_span(30)), 1..8)
    )| {
        let wm = symmetric(32, &[0.01, 0.03, -0.02, 0.05, 0.0]);
        let original: Vec<Rect> = spans.iter().map(|&(x, y)| Rect { x, y }).collect();
        let mut rects = original.clone();
        resolve_overlap(&wm, &mut rects);
        for (before, after) in original.iter().zip(&rects) {
            prop_assert!(contains(&before.x, &after.x));
            prop_assert!(contains(&before.y, &after.y));
        }
    });
}

/// Property: a second overlap pass leaves the surviving branches unchanged
#[test]
fn prop_overlap_removal_is_idempotent() {
    proptest!(|(
        spans in prop::collection::vec((random_span(30), random_span(30)), 1..8),
        values in prop::collection::vec(0.001f64..0.1, 4..40)
    )| {
        let wm = symmetric(32, &values);
        let mut branches: Vec<Branch> = spans
            .iter()
            .map(|&(x, y)| Branch { rect: Rect { x, y }, band: Vec::new(), live: true })
            .collect();

        remove_branch_overlap(&wm, &mut branches);
        let mut once = compact(branches);
        let expected = once.clone();
        prop_assert_eq!(remove_branch_overlap(&wm, &mut once), 0);
        prop_assert_eq!(compact(once), expected);
    });
}

/// Property: no crossing pair of live branches survives on a positive map
#[test]
fn prop_conflicts_are_resolved() {
    proptest!(|(
        ends in prop::collection::vec((1i64..25, 0i64..25), 1..10),
        values in prop::collection::vec(0.001f64..0.1, 16..64)
    )| {
        let wm = symmetric(30, &values);
        let mut branches: Vec<Branch> = ends
            .iter()
            .map(|&(entry, len)| {
                let exit = (entry + len).min(28);
                Branch { rect: Rect::new(entry, entry, exit, exit), band: Vec::new(), live: true }
            })
            .collect();
        let before = branches.len();
        let flagged = resolve_conflicts(&wm, &mut branches);
        let after = branches.iter().filter(|b| b.live).count();
        prop_assert!(after <= before);
        prop_assert_eq!(flagged, before - after);

        for i in 0..branches.len() {
            for j in 0..i {
                if !(branches[i].live && branches[j].live) {
                    continue;
                }
                let (a1, a2) = (branches[i].rect.entry(), branches[i].rect.exit());
                let (b1, b2) = (branches[j].rect.entry(), branches[j].rect.exit());
                let crossing = b1 < a1 && a1 < b2 && !(b1 <= a2 && a2 <= b2);
                prop_assert!(!crossing, "live crossing pair {:?} {:?}", (b1, b2), (a1, a2));
            }
        }
    });
}

fn unit_walk() -> impl Strategy<Value = Vec<Point3>> {
    prop::collection::vec((0.0f64..2.0 * PI, -1.0f64..1.0), 6..40).prop_map(|steps| {
        let mut p = [0.0, 0.0, 0.0];
        let mut pts = vec![p];
        for (phi, cos_theta) in steps {
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            p = [
                p[0] + sin_theta * phi.cos(),
                p[1] + sin_theta * phi.sin(),
                p[2] + cos_theta,
            ];
            pts.push(p);
        }
        pts
    })
}

/// Property: a chain of unit steps has unit discretization length
#[test]
fn prop_unit_walk_discretization() {
    proptest!(|(conf in unit_walk())| {
        prop_assert_eq!(disc_len(&conf), Some(1.0));
    });
}

/// Property: segment writhe maps are symmetric, bounded and zero on the boundary
#[test]
fn prop_writhe_map_shape() {
    proptest!(|(conf in unit_walk())| {
        let wm = SegmentWritheMapper::new().writhe_map(&conf).unwrap();
        let n = wm.size();
        prop_assert_eq!(n, conf.len() - 1);
        for i in 0..n {
            prop_assert_eq!(wm.get(0, i), 0.0);
            prop_assert_eq!(wm.get(n - 1, i), 0.0);
            for j in 0..n {
                prop_assert_eq!(wm.get(i, j), wm.get(j, i));
                prop_assert!(wm.get(i, j).abs() <= 0.5 + 1e-12);
            }
        }
    });
}
