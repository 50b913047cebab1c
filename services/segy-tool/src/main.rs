//! SEG-Y inspection and chunking tool.
//!
//! Prints file headers, loads trace data, divides a file into NPY chunks,
//! and generates synthetic sample files.

mod sample;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use seismic_chunker::{
    divide_segy_file, parse_chunk_file_name, read_npy, ChunkerConfig, DataAccessor, HeaderInfo,
};

use sample::{create_sample_segy, SampleSpec};

#[derive(Parser, Debug)]
#[command(name = "segy-tool")]
#[command(about = "Inspect SEG-Y files and divide them into NPY chunks")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the file header summary
    Header {
        file: PathBuf,

        /// Also print the textual header
        #[arg(long)]
        textual: bool,

        /// Print the header of one trace
        #[arg(long)]
        trace: Option<usize>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a trace range and report its shape and axes
    Load {
        file: PathBuf,

        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Exclusive end trace (default: last trace)
        #[arg(long)]
        end: Option<usize>,

        /// Compute statistics over the loaded data
        #[arg(long)]
        stats: bool,
    },

    /// Partition a file into chunks, optionally writing them out
    Divide {
        file: PathBuf,

        #[arg(long)]
        traces_per_chunk: Option<usize>,

        #[arg(long)]
        depth_interval_ms: Option<f64>,

        /// Write chunks here; partition only when omitted
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[arg(long)]
        prefix: Option<String>,

        /// YAML configuration file (default: SEGY_* environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a synthetic SEG-Y file
    CreateSample {
        #[arg(default_value = "mini_sample.segy")]
        file: PathBuf,

        #[arg(long, default_value_t = 50)]
        traces: usize,

        #[arg(long, default_value_t = 250)]
        samples: usize,

        #[arg(long, default_value_t = 2000)]
        interval_us: u16,

        /// Seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List chunk files in a directory
    Inspect { dir: PathBuf },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    match args.command {
        Command::Header {
            file,
            textual,
            trace,
            json,
        } => header(file, textual, trace, json),
        Command::Load {
            file,
            start,
            end,
            stats,
        } => load(file, start, end, stats),
        Command::Divide {
            file,
            traces_per_chunk,
            depth_interval_ms,
            output_dir,
            prefix,
            config,
        } => {
            let mut config = match config {
                Some(path) => ChunkerConfig::from_yaml(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ChunkerConfig::from_env(),
            };
            if let Some(n) = traces_per_chunk {
                config.traces_per_chunk = n;
            }
            if let Some(ms) = depth_interval_ms {
                config.depth_interval_ms = ms;
            }
            if let Some(prefix) = prefix {
                config.chunk_prefix = prefix;
            }
            divide(file, &config, output_dir)
        }
        Command::CreateSample {
            file,
            traces,
            samples,
            interval_us,
            seed,
        } => {
            let spec = SampleSpec {
                num_traces: traces,
                num_samples: samples,
                sample_interval_us: interval_us,
                seed,
            };
            let size = create_sample_segy(&file, &spec)?;
            println!("Created {} ({} bytes)", file.display(), size);
            Ok(())
        }
        Command::Inspect { dir } => inspect(dir),
    }
}

fn header(file: PathBuf, textual: bool, trace: Option<usize>, json: bool) -> Result<()> {
    let mut headers = HeaderInfo::open(&file)?;

    if json {
        let summary = headers.file_summary()?;
        let trace = trace.map(|i| headers.trace_header(i)).transpose()?;
        let value = serde_json::json!({
            "summary": summary,
            "textual_header": textual.then(|| headers.textual_header()),
            "trace_header": trace,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if textual {
        println!("TEXTUAL HEADER");
        println!("{}", "=".repeat(80));
        println!("{}", headers.textual_header());
        println!();
    }

    println!("{}", headers.file_summary()?);

    if let Some(index) = trace {
        println!();
        println!("{}", headers.trace_header(index)?);
    }
    Ok(())
}

fn load(file: PathBuf, start: usize, end: Option<usize>, stats: bool) -> Result<()> {
    let config = ChunkerConfig::from_env();
    let mut accessor = DataAccessor::open_with_config(&file, &config)?;
    let info = accessor.file_info();
    let end = end.unwrap_or(info.total_traces);

    let block = accessor.load_traces(start, end)?;
    let (traces, samples) = block.shape();
    info!(start, end, traces, samples, "Loaded traces");

    println!("{}", accessor.summary(false)?);
    println!();
    println!("Loaded traces [{}, {}): shape ({}, {})", start, end, traces, samples);

    let trace_axis = accessor.trace_axis(Some(start..end));
    if let (Some(first), Some(last)) = (trace_axis.first(), trace_axis.last()) {
        println!("Trace axis: {} .. {}", first, last);
    }
    let time_axis = accessor.time_axis_range(None);
    if let (Some(first), Some(last)) = (time_axis.first(), time_axis.last()) {
        println!("Time axis: {:.2} .. {:.2} ms", first, last);
    }

    if stats {
        if block.is_empty() {
            bail!("No data loaded, cannot compute statistics");
        }
        println!();
        println!("{}", accessor.statistics(Some(&block))?);
    }
    Ok(())
}

fn divide(file: PathBuf, config: &ChunkerConfig, output_dir: Option<PathBuf>) -> Result<()> {
    let report = divide_segy_file(&file, config, output_dir.as_deref())?;
    println!("{}", report.summary);

    if let Some(written) = report.written {
        println!();
        println!(
            "Wrote {} chunks ({} bytes) to {}",
            written.chunks_written,
            written.bytes_written,
            output_dir
                .as_deref()
                .map(|d| d.display().to_string())
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn inspect(dir: PathBuf) -> Result<()> {
    let mut arrays: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "npy"))
        .collect();
    arrays.sort();

    if arrays.is_empty() {
        println!("No chunk files in {}", dir.display());
        return Ok(());
    }

    for path in &arrays {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let block = read_npy(path)?;
        let (traces, samples) = block.shape();
        match parse_chunk_file_name(name) {
            Some((number, id)) => println!(
                "#{:04} {} shape ({}, {})  {}",
                number, id, traces, samples, name
            ),
            None => println!("      shape ({}, {})  {}", traces, samples, name),
        }
    }
    println!("{} chunk arrays", arrays.len());
    Ok(())
}
