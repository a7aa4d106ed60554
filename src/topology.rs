/// Topology record of one configuration
///
/// Field names follow the established record layout consumed by downstream
/// storage and plotting tools (`N`, `L`, `discLen`, `numPlecs`, ...).
use log::warn;
use serde::Serialize;

use crate::branch::Branch;
use crate::combine::Composite;
use crate::plectoneme::Plectoneme;
use crate::writhe_map::WritheMatrix;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlecRecord {
    pub id1: usize,
    pub id2: usize,
    pub wrdens: f64,
    pub wr: f64,
    pub num_segs: usize,
    #[serde(rename = "L")]
    pub length: f64,
    /// Indices into the branch list of the enclosing [`Topology`]
    pub branch_ids: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    pub id: usize,
    pub x1: i64,
    pub x2: i64,
    pub y1: i64,
    pub y2: i64,
    pub wr: f64,
    pub wr_down: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracerRecord {
    pub id: usize,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(rename = "N")]
    pub n: usize,
    #[serde(rename = "L")]
    pub length: f64,
    pub disc_len: f64,
    pub wr: f64,
    pub num_plecs: usize,
    pub num_branches: usize,
    pub num_tracers: usize,
    pub plecs: Vec<PlecRecord>,
    pub branches: Vec<BranchRecord>,
    pub tracers: Vec<TracerRecord>,
    pub no_overlap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wm: Option<Vec<Vec<f64>>>,
}

impl Topology {
    /// Record of a configuration without any plectoneme
    pub fn empty(wm: &WritheMatrix, disc_len: f64, no_overlap: bool, include_wm: bool) -> Self {
        assemble(wm, disc_len, &[], &[], &[], no_overlap, include_wm)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Package plectonemes with the branches they contain
///
/// Only branches belonging to an emitted plectoneme are listed, grouped per
/// plectoneme in containment order; the plectoneme branch ids refer to that
/// list. Branch writhe is reported from the unoriented map `wm`.
pub fn assemble(
    wm: &WritheMatrix,
    disc_len: f64,
    plecs: &[Plectoneme],
    composites: &[Composite],
    branches: &[Branch],
    no_overlap: bool,
    include_wm: bool,
) -> Topology {
    let mut plec_records = Vec::with_capacity(plecs.len());
    let mut branch_records = Vec::new();
    let mut tracer_records = Vec::new();

    for plec in plecs {
        let mut branch_ids = Vec::new();
        for &bid in &composites[plec.composite].branch_ids {
            let branch = &branches[bid];
            let id = branch_records.len();
            let r = branch.rect;
            if r.x.hi > r.y.hi {
                warn!("branch terminates in lower triangle: ({}, {})", r.x.hi, r.y.hi);
            }
            branch_records.push(BranchRecord {
                id,
                x1: r.x.lo,
                x2: r.x.hi,
                y1: r.y.lo,
                y2: r.y.hi,
                wr: 2.0 * r.writhe(wm),
                wr_down: wm.box_sum(r.x.lo, r.y.hi, r.x.lo, r.y.hi),
            });
            tracer_records.push(TracerRecord {
                id,
                points: branch.band.iter().map(|p| [p.x as f64, p.y]).collect(),
            });
            branch_ids.push(id);
        }
        plec_records.push(PlecRecord {
            id1: plec.entry,
            id2: plec.exit,
            wrdens: plec.writhe_density,
            wr: plec.writhe,
            num_segs: plec.num_segs,
            length: plec.num_segs as f64 * disc_len,
            branch_ids,
        });
    }

    let n = wm.size();
    Topology {
        n,
        length: n as f64 * disc_len,
        disc_len,
        wr: wm.total(),
        num_plecs: plec_records.len(),
        num_branches: branch_records.len(),
        num_tracers: tracer_records.len(),
        plecs: plec_records,
        branches: branch_records,
        tracers: tracer_records,
        no_overlap,
        wm: include_wm.then(|| wm.to_rows()),
    }
}
