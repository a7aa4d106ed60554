use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use plecfinder::conformation::read_conformations;
use plecfinder::{FinderConfig, PlecFinder};

/// PlecFinder - plectoneme detection from the writhe map
///
/// Reads chain configurations (one `x y z` point per line, blank lines between
/// frames) and writes one JSON topology record per frame.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Configuration files
    #[clap(value_name = "CONF", required = true, num_args = 1..)]
    conf_files: Vec<PathBuf>,

    /// Minimum writhe density of a plectonemic region (rad per length unit)
    #[clap(short = 'd', long = "min-writhe-density")]
    min_writhe_density: f64,

    /// Minimum total writhe of a plectoneme
    #[clap(short = 'w', long = "min-writhe")]
    min_writhe: f64,

    /// Distance within which dense segment pairs are chained into one branch
    #[clap(short = 'c', long = "connect-dist", default_value = "10.0")]
    connect_dist: f64,

    /// Discretization length (mean segment length of the first frame if omitted)
    #[clap(long = "disc-len")]
    disc_len: Option<f64>,

    /// Intrinsic twist (rad per length unit)
    #[clap(long = "om0", default_value = "1.76")]
    om0: f64,

    /// Keep overlap between neighbouring branches
    #[clap(long = "allow-overlap")]
    allow_overlap: bool,

    /// Include the full writhe map in every record (large)
    #[clap(long = "include-wm")]
    include_wm: bool,

    /// Output file (stdout if not specified)
    #[clap(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Number of threads for parallel processing
    #[clap(short = 't', long = "threads", default_value = "8")]
    threads: usize,

    /// Quiet mode (warnings only)
    #[clap(long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Set up rayon thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let mut config = FinderConfig::new(args.min_writhe_density, args.min_writhe);
    config.disc_len = args.disc_len;
    config.connect_dist = args.connect_dist;
    config.om0 = args.om0;
    config.no_overlap = !args.allow_overlap;
    config.include_writhe_matrix = args.include_wm;
    config.validate()?;

    let finder = PlecFinder::new(config);

    let mut output: Box<dyn Write> = if let Some(ref path) = args.output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    for path in &args.conf_files {
        let frames = read_conformations(path)?;
        if frames.is_empty() {
            warn!("{}: no configurations found", path.display());
            continue;
        }

        let topologies = finder
            .find_plecs_batch(&frames)
            .with_context(|| format!("evaluating {}", path.display()))?;

        let num_plecs: usize = topologies.iter().map(|t| t.num_plecs).sum();
        info!(
            "{}: {} configurations, {} plectonemes",
            path.display(),
            topologies.len(),
            num_plecs
        );

        for topology in &topologies {
            writeln!(output, "{}", topology.to_json()?)?;
        }
    }
    output.flush()?;

    Ok(())
}
