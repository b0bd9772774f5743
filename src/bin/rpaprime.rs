use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use rpaprime::config::{DesignConfig, ErrorPolicy, Material, Preset};
use rpaprime::output::{write_primers, write_summary, OutputFormat};
use rpaprime::{design_primers, Oracles, PrimerError};

/// rpaprime CLI
#[derive(Parser)]
#[command(name = "rpaprime")]
#[command(version)]
#[command(about = "Select RPA primers from genomic FASTA by Tm, GC, secondary structure and folding ΔG", long_about = None)]
struct Cli {
    /// Input FASTA (plain or compressed)
    #[arg(default_value = "genome.fasta")]
    fasta: PathBuf,

    /// JSON design configuration; absent fields keep their defaults
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Named parameter set (rpa, lamp)
    #[arg(long, default_value = "rpa")]
    preset: Preset,

    /// Primer length
    #[arg(long)]
    window: Option<usize>,

    /// Primers kept per input sequence
    #[arg(long)]
    top: Option<usize>,

    /// Threads (0/None = all)
    #[arg(long)]
    threads: Option<usize>,

    /// Nucleic-acid model for folding (dna)
    #[arg(long)]
    material: Option<Material>,

    /// Abort on the first candidate whose properties cannot be computed
    #[arg(long)]
    fail_fast: bool,

    /// Per-candidate deadline across all oracle calls, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output format (text, csv, json, table)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Write the result set to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print per-record counts and skipped candidates to stderr
    #[arg(long)]
    summary: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn design_config(&self) -> anyhow::Result<DesignConfig> {
        let mut cfg = match &self.config {
            Some(p) => DesignConfig::from_json_file(p)?,
            None => DesignConfig::preset(self.preset),
        };
        if let Some(w) = self.window {
            cfg.window_len = w;
        }
        if let Some(n) = self.top {
            cfg.top_n = n;
        }
        if self.threads.is_some() {
            cfg.threads = self.threads;
        }
        if let Some(m) = self.material {
            cfg.material = m;
        }
        if self.fail_fast {
            cfg.on_error = ErrorPolicy::Abort;
        }
        if self.timeout_ms.is_some() {
            cfg.oracle_timeout_ms = self.timeout_ms;
        }
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.design_config()?;

    if cli.print_config {
        println!("{}", cfg.to_json_pretty()?);
        return Ok(());
    }
    cfg.validate()?;

    eprintln!(
        "rpaprime: input={} | window={} | top={} | material={} | threads={} | on_error={:?}",
        cli.fasta.display(),
        cfg.window_len,
        cfg.top_n,
        cfg.material,
        cfg.effective_threads(),
        cfg.on_error
    );

    let oracles = Oracles::builtin(&cfg);
    let report = match design_primers(&cli.fasta, &cfg, &oracles) {
        Ok(r) => r,
        Err(PrimerError::NotFound { path }) => {
            println!("Error: {} not found!", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if cli.format == OutputFormat::Table {
        // Show every row and column untruncated.
        std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
        std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
        std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
        std::env::set_var("POLARS_FMT_STR_LEN", "100000");
        std::env::set_var("POLARS_TABLE_WIDTH", "65535");
    }

    match &cli.output {
        Some(p) => {
            let f = File::create(p).with_context(|| format!("cannot create {}", p.display()))?;
            write_primers(BufWriter::new(f), &report.primers, cli.format)?;
        }
        None => {
            let stdout = std::io::stdout();
            write_primers(stdout.lock(), &report.primers, cli.format)?;
        }
    }

    if cli.summary {
        let stderr = std::io::stderr();
        let mut h = stderr.lock();
        write_summary(&mut h, &report)?;
        h.flush()?;
    } else if !report.failures.is_empty() {
        eprintln!(
            "rpaprime: skipped {} candidate(s) whose properties could not be computed (see --summary)",
            report.failures.len()
        );
    }
    eprintln!(
        "rpaprime: records={} | candidates={} | primers={}",
        report.records.len(),
        report.total_candidates(),
        report.primers.len()
    );
    Ok(())
}
