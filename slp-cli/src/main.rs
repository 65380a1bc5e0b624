#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slp_matrix::{invert, parse_archive, ArchiveEntry, GfMatrix};
use slp_orchestrator::{evaluate_with_inverse, solve, Algorithm, SolveConfig};
use slp_solvers::RunControl;

#[derive(Parser, Debug)]
#[command(name = "slp", version, about = "XOR-count minimisation for GF(2) linear layers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve every matrix in a file with the chosen algorithms
    Solve {
        /// Matrix file: bare 0/1 rows, or a `-----`-separated archive
        /// of titled `[1 0 1]` sections
        file: PathBuf,
        /// Algorithms to run (default: all of boyar, paar, slp, sbp)
        #[arg(short = 'a', long = "algorithm")]
        algorithms: Vec<Algorithm>,
        /// Depth limit for the depth-aware algorithms
        #[arg(long = "depth-limit", default_value_t = slp_solvers::DEFAULT_DEPTH_LIMIT)]
        depth_limit: u32,
        /// Program-length cap for sbp
        #[arg(long = "program-cap", default_value_t = slp_solvers::DEFAULT_PROGRAM_CAP)]
        program_cap: usize,
        /// Give up after this many milliseconds per solver run
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,
        /// Emit JSON instead of plain text
        #[arg(long = "json", default_value_t = false)]
        json: bool,
    },
    /// Solve every matrix in a file together with its GF(2) inverse
    Batch {
        /// Archive file of titled matrix sections
        file: PathBuf,
        #[arg(short = 'a', long = "algorithm")]
        algorithms: Vec<Algorithm>,
        #[arg(long = "depth-limit", default_value_t = slp_solvers::DEFAULT_DEPTH_LIMIT)]
        depth_limit: u32,
        #[arg(long = "json", default_value_t = false)]
        json: bool,
    },
    /// Print the GF(2) inverse of the first matrix in a file
    Inverse {
        file: PathBuf,
        /// Also print the row-wise hex form
        #[arg(long = "hex", default_value_t = false)]
        hex: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Solve { file, algorithms, depth_limit, program_cap, timeout_ms, json } => {
            let config = SolveConfig { depth_limit, program_cap };
            run_solve(&file, &pick(algorithms), &config, timeout_ms, json)
        }
        Commands::Batch { file, algorithms, depth_limit, json } => {
            let config = SolveConfig { depth_limit, ..SolveConfig::default() };
            run_batch(&file, &pick(algorithms), &config, json)
        }
        Commands::Inverse { file, hex } => run_inverse(&file, hex),
    }
}

fn pick(algorithms: Vec<Algorithm>) -> Vec<Algorithm> {
    if algorithms.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        algorithms
    }
}

/// Read a matrix file: archives hold bracketed sections, anything else
/// is taken as one matrix of whitespace-separated 0/1 rows.
fn load_matrices(file: &PathBuf) -> Result<Vec<ArchiveEntry>> {
    let content = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;

    if content.contains('[') {
        let entries = parse_archive(&content)?;
        if entries.is_empty() {
            bail!("{} holds no matrix sections", file.display());
        }
        return Ok(entries);
    }

    let rows: Vec<Vec<String>> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            if l.contains([' ', ',', '\t']) {
                l.split([' ', ',', '\t']).filter(|e| !e.is_empty()).map(str::to_string).collect()
            } else {
                l.chars().map(String::from).collect()
            }
        })
        .collect();
    if rows.is_empty() {
        bail!("{} holds no matrix rows", file.display());
    }
    Ok(vec![ArchiveEntry {
        title: file.display().to_string(),
        matrix: GfMatrix::parse_entries(&rows)?,
    }])
}

fn run_solve(
    file: &PathBuf,
    algorithms: &[Algorithm],
    config: &SolveConfig,
    timeout_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let entries = load_matrices(file)?;

    for entry in &entries {
        if !json {
            println!(
                "{} ({}x{}, ham xor {})",
                entry.title,
                entry.matrix.height(),
                entry.matrix.width(),
                entry.matrix.ham_xor()
            );
        }
        for &algorithm in algorithms {
            let ctl = match timeout_ms {
                Some(ms) => RunControl::new().with_deadline(Instant::now() + Duration::from_millis(ms)),
                None => RunControl::new(),
            };
            match solve(algorithm, &entry.matrix, config, &ctl) {
                Ok((solution, metrics)) => {
                    if json {
                        println!("{}", serde_json::to_string(&serde_json::json!({
                            "title": entry.title,
                            "algorithm": algorithm,
                            "xor_count": solution.xor_count,
                            "depth": solution.depth,
                            "complete": solution.is_complete(),
                            "program": solution.render(),
                            "solve_ms": metrics.solve_ms,
                        }))?);
                    } else {
                        println!(
                            "  {}: {} xors, depth {}{}  ({:.2} ms)",
                            algorithm,
                            solution.xor_count,
                            solution.depth,
                            if solution.is_complete() { "" } else { " [truncated]" },
                            metrics.solve_ms
                        );
                        for line in solution.render() {
                            println!("    {line}");
                        }
                    }
                }
                Err(e) => {
                    if json {
                        println!("{}", serde_json::to_string(&serde_json::json!({
                            "title": entry.title,
                            "algorithm": algorithm,
                            "error": e.to_string(),
                        }))?);
                    } else {
                        println!("  {algorithm}: error: {e}");
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_batch(file: &PathBuf, algorithms: &[Algorithm], config: &SolveConfig, json: bool) -> Result<()> {
    let entries = load_matrices(file)?;
    let ctl = RunControl::new();

    for (index, entry) in entries.iter().enumerate() {
        let report = evaluate_with_inverse(index, &entry.matrix, algorithms, config, &ctl);
        if json {
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        let smallest = report
            .original
            .smallest_xor
            .map_or_else(|| "-".to_string(), |x| x.to_string());
        let inverse_smallest = report
            .inverse
            .as_ref()
            .and_then(|r| r.smallest_xor)
            .map_or_else(|| "-".to_string(), |x| x.to_string());
        println!(
            "{}: smallest xor {}, inverse {}{}",
            entry.title,
            smallest,
            inverse_smallest,
            report
                .inverse_error
                .as_deref()
                .map(|e| format!(" ({e})"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn run_inverse(file: &PathBuf, hex: bool) -> Result<()> {
    let entries = load_matrices(file)?;
    let entry = &entries[0];
    let inverse = invert(&entry.matrix)
        .with_context(|| format!("inverting '{}'", entry.title))?;

    println!("{}", inverse.to_binary_text());
    if hex {
        println!("{}", inverse.to_hex());
    }
    Ok(())
}
