/// Plectoneme finder driving the detection pipeline
///
/// One call evaluates one configuration: pairs are detected on the oriented
/// writhe map, chained into tracers, promoted to branches, cleaned of overlap
/// and conflicts, combined and finally thresholded into plectonemes.
use anyhow::{bail, Context, Result};
use log::debug;
use rayon::prelude::*;

use crate::branch::{classify_tracers, compact};
use crate::combine::combine_branches;
use crate::conflict::resolve_conflicts;
use crate::geometry::{self, Point3};
use crate::overlap::remove_branch_overlap;
use crate::pairs::{find_pairs, min_writhe_per_segment};
use crate::plectoneme::{define_plecs, PlecThresholds};
use crate::topology::{assemble, Topology};
use crate::tracer::{build_tracers, connect_segments};
use crate::writhe_map::{SegmentWritheMapper, WritheMapper, WritheMatrix};

/// Finder configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub min_writhe_density: f64,     // -d/--min-writhe-density
    pub plec_min_writhe: f64,        // -w/--min-writhe
    pub disc_len: Option<f64>,       // --disc-len, mean segment length if unset
    pub connect_dist: f64,           // -c/--connect-dist
    pub om0: f64,                    // --om0, intrinsic twist (rad per length unit)
    pub no_overlap: bool,            // cleared by --allow-overlap
    pub include_writhe_matrix: bool, // --include-wm
}

impl FinderConfig {
    pub const DEFAULT_CONNECT_DIST: f64 = 10.0;
    pub const DEFAULT_OM0: f64 = 1.76;

    pub fn new(min_writhe_density: f64, plec_min_writhe: f64) -> Self {
        FinderConfig {
            min_writhe_density,
            plec_min_writhe,
            disc_len: None,
            connect_dist: Self::DEFAULT_CONNECT_DIST,
            om0: Self::DEFAULT_OM0,
            no_overlap: true,
            include_writhe_matrix: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_writhe_density.is_nan() || self.min_writhe_density < 0.0 {
            bail!(
                "minimum writhe density must be non-negative, got {}",
                self.min_writhe_density
            );
        }
        if self.plec_min_writhe.is_nan() || self.plec_min_writhe < 0.0 {
            bail!(
                "minimum plectoneme writhe must be non-negative, got {}",
                self.plec_min_writhe
            );
        }
        if let Some(d) = self.disc_len {
            check_positive("discretization length", d)?;
        }
        check_positive("connect distance", self.connect_dist)?;
        check_positive("intrinsic twist om0", self.om0)?;
        Ok(())
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 {
        bail!("{name} must be positive, got {value}");
    }
    Ok(())
}

pub struct PlecFinder<M: WritheMapper = SegmentWritheMapper> {
    config: FinderConfig,
    mapper: M,
}

impl PlecFinder<SegmentWritheMapper> {
    pub fn new(config: FinderConfig) -> Self {
        PlecFinder {
            config,
            mapper: SegmentWritheMapper::new(),
        }
    }
}

impl<M: WritheMapper> PlecFinder<M> {
    /// Replace the writhe-map provider
    pub fn with_mapper<N: WritheMapper>(self, mapper: N) -> PlecFinder<N> {
        PlecFinder {
            config: self.config,
            mapper,
        }
    }

    pub fn with_disc_len(mut self, disc_len: f64) -> Self {
        self.config.disc_len = Some(disc_len);
        self
    }

    pub fn with_connect_dist(mut self, connect_dist: f64) -> Self {
        self.config.connect_dist = connect_dist;
        self
    }

    pub fn with_om0(mut self, om0: f64) -> Self {
        self.config.om0 = om0;
        self
    }

    pub fn with_no_overlap(mut self, no_overlap: bool) -> Self {
        self.config.no_overlap = no_overlap;
        self
    }

    pub fn with_writhe_matrix(mut self, include: bool) -> Self {
        self.config.include_writhe_matrix = include;
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Topology of a single configuration
    pub fn find_plecs(&self, conf: &[Point3]) -> Result<Topology> {
        let wm = self.mapper.writhe_map(conf)?;
        let disc_len = match self.config.disc_len {
            Some(d) => d,
            None => geometry::disc_len(conf).context("configuration too short to derive disc_len")?,
        };
        self.find_in_matrix(&wm, disc_len)
    }

    /// Topologies of independent configurations, evaluated in parallel
    ///
    /// Without a configured discretization length all configurations share
    /// the one measured on the first configuration.
    pub fn find_plecs_batch(&self, confs: &[Vec<Point3>]) -> Result<Vec<Topology>> {
        let Some(first) = confs.first() else {
            return Ok(Vec::new());
        };
        let disc_len = match self.config.disc_len {
            Some(d) => d,
            None => geometry::disc_len(first).context("configuration too short to derive disc_len")?,
        };
        confs
            .par_iter()
            .enumerate()
            .map(|(k, conf)| {
                let wm = self
                    .mapper
                    .writhe_map(conf)
                    .with_context(|| format!("configuration {k}"))?;
                self.find_in_matrix(&wm, disc_len)
            })
            .collect()
    }

    /// Topology from a precomputed writhe map
    pub fn find_in_matrix(&self, wm: &WritheMatrix, disc_len: f64) -> Result<Topology> {
        self.config.validate()?;
        check_positive("discretization length", disc_len)?;
        let cfg = &self.config;
        let empty = || Topology::empty(wm, disc_len, cfg.no_overlap, cfg.include_writhe_matrix);

        let pwm = wm.oriented();
        let min_wr_per_seg = min_writhe_per_segment(cfg.min_writhe_density, disc_len, cfg.om0);

        let pairs = find_pairs(&pwm, min_wr_per_seg);
        if pairs.is_empty() {
            debug!("no segment pairs above {min_wr_per_seg:.4} writhe per segment");
            return Ok(empty());
        }

        let tracers = build_tracers(&pairs, connect_segments(cfg.connect_dist, disc_len));
        debug!("chained {} pairs into {} tracers", pairs.len(), tracers.len());

        let mut branches =
            classify_tracers(&pwm, &tracers, cfg.min_writhe_density, disc_len, cfg.om0);
        if branches.is_empty() {
            return Ok(empty());
        }

        if cfg.no_overlap {
            remove_branch_overlap(&pwm, &mut branches);
            branches = compact(branches);
        }
        resolve_conflicts(&pwm, &mut branches);
        let branches = compact(branches);

        let composites = combine_branches(&pwm, &branches, min_wr_per_seg);
        let thresholds = PlecThresholds {
            min_writhe_density: cfg.min_writhe_density,
            min_writhe: cfg.plec_min_writhe,
            disc_len,
            om0: cfg.om0,
        };
        let plecs = define_plecs(&pwm, &composites, &thresholds);

        Ok(assemble(
            wm,
            disc_len,
            &plecs,
            &composites,
            &branches,
            cfg.no_overlap,
            cfg.include_writhe_matrix,
        ))
    }
}
