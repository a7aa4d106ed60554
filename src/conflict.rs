/// Resolution of branches that overlap without proper nesting
///
/// A branch whose entrance falls strictly inside an earlier branch, but whose
/// exit lies outside of it, cannot belong to the same loop hierarchy. Either
/// the later branch or all earlier branches it conflicts with are flagged,
/// whichever side carries less writhe.
///
/// Only backward conflicts are resolved: a branch that loses against a later
/// branch is never revisited once its own turn has passed.
use log::debug;

use crate::branch::{is_downstream, Branch};
use crate::writhe_map::WritheMatrix;

/// Flag conflicting branches; returns the number of branches flagged
pub fn resolve_conflicts(wm: &WritheMatrix, branches: &mut [Branch]) -> usize {
    let mut flagged = 0;
    for i in 1..branches.len() {
        if !branches[i].live {
            continue;
        }
        let a1 = branches[i].rect.entry();
        let a2 = branches[i].rect.exit();

        let mut conflict_wr = 0.0;
        let mut conflict_ids = Vec::new();
        for (j, other) in branches[..i].iter().enumerate() {
            if !other.live {
                continue;
            }
            let b1 = other.rect.entry();
            let b2 = other.rect.exit();
            if b1 < a1 && a1 < b2 && !is_downstream(b1, b2, a1, a2) {
                conflict_wr += other.rect.writhe(wm);
                conflict_ids.push(j);
            }
        }

        if conflict_wr > 0.0 {
            if branches[i].rect.writhe(wm) > conflict_wr {
                for &j in &conflict_ids {
                    branches[j].kill();
                }
                flagged += conflict_ids.len();
            } else {
                branches[i].kill();
                flagged += 1;
            }
        }
    }
    debug!("conflict resolution flagged {flagged} branches");
    flagged
}
