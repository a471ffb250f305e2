//! trt-builder - Build a serialized TensorRT engine from an ONNX model

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use trt_builder::{BuildConfig, Logger, Precision, Runtime, Severity};

/// File name of the engine when no output path is given.
const DEFAULT_ENGINE_FILE: &str = "engine.trt";

#[derive(Parser, Debug)]
#[command(name = "trt-builder")]
#[command(author, version, about = "Build a TensorRT engine from an ONNX model")]
#[command(
    long_about = "Parses an ONNX model, optimizes it for the GPU in this machine and writes the \
                  serialized TensorRT engine to disk.\n\nThe model must have a single input \
                  shaped [batch, 3, width, height]. A dynamic batch dimension accepts any batch \
                  from 1 up to the requested batch size. Other dynamic dimensions are fixed to \
                  the requested width and height."
)]
struct Cli {
    /// ONNX model to convert
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Floating point precision of the engine, 32 or 16
    #[arg(short, long, default_value = "32")]
    precision: Precision,

    /// Maximum batch size
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    batch_size: u32,

    /// Workspace size in MB available to the builder
    #[arg(short, long, default_value_t = 1024, value_parser = clap::value_parser!(u64).range(1..))]
    workspace: u64,

    /// Model input width (third input axis), also accepted as -mw
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
    model_width: u32,

    /// Model input height (fourth input axis), also accepted as -mh
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
    model_height: u32,

    /// Engine file to write [default: engine.trt next to the executable]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Load the saved engine again and log its input and output tensors
    #[arg(long)]
    verify: bool,

    /// Increase log verbosity, can be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn build_config(&self) -> BuildConfig {
        BuildConfig::default()
            .with_precision(self.precision)
            .with_batch_size(self.batch_size)
            .with_workspace_mb(self.workspace)
            .with_input_size(self.model_width, self.model_height)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_tracing(cli.verbose);
    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let output = match &cli.output {
        Some(output) => output.clone(),
        None => default_output_path()?,
    };
    let config = cli.build_config();
    let logger = Arc::new(Logger::new(tensorrt_severity(cli.verbose))?);

    println!("Building TensorRT engine. This may take a few minutes.");
    let engine = trt_builder::build_engine(&logger, &cli.input, &config)
        .with_context(|| format!("failed to build engine from {}", cli.input.display()))?;
    let Some(engine) = engine else {
        tracing::error!(
            model = %cli.input.display(),
            "TensorRT did not produce an engine, nothing was saved"
        );
        return Ok(ExitCode::FAILURE);
    };

    trt_builder::save_engine(&engine, &output)
        .with_context(|| format!("failed to save engine to {}", output.display()))?;
    println!("TensorRT engine saved to {}", output.display());

    if cli.verify {
        verify(&logger, &output)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn verify(logger: &Arc<Logger>, path: &Path) -> anyhow::Result<()> {
    let runtime = Runtime::new(logger)?;
    let engine = trt_builder::load_engine(runtime, path)
        .with_context(|| format!("failed to load engine from {}", path.display()))?;
    for (name, mode, shape) in engine.io_tensors() {
        tracing::info!(%name, %mode, ?shape, "engine tensor");
    }
    Ok(())
}

fn default_output_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate executable")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(DEFAULT_ENGINE_FILE))
}

/// Rewrite the two-letter `-mw` and `-mh` flags to their long forms, which clap can parse.
///
/// Accepts `-mw 300`, `-mw=300` and `-mw300`. Arguments after `--` are left alone.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut escaped = false;
    args.into_iter()
        .map(|arg| {
            if escaped {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                escaped = true;
                return arg;
            }
            for (short, long) in [("-mw", "--model-width"), ("-mh", "--model-height")] {
                if let Some(rest) = s.strip_prefix(short) {
                    let value = rest.strip_prefix('=').unwrap_or(rest);
                    return if rest.is_empty() {
                        OsString::from(long)
                    } else {
                        OsString::from(format!("{long}={value}"))
                    };
                }
            }
            arg
        })
        .collect()
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Minimum severity of TensorRT messages that reach `tracing`.
fn tensorrt_severity(verbose: u8) -> Severity {
    match verbose {
        0 | 1 => Severity::Warning,
        2 => Severity::Info,
        _ => Severity::Verbose,
    }
}
