//! Command-line interface components.

use crate::config::VfpConfig;
use crate::constants;
use crate::flow::{self, FlowFileName, derive_sweep};
use crate::geo;
use crate::models::{FileKind, ParsedFile, ProcessingStats};
use crate::processor::{CaseProcessor, parse_path};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "vfp")]
#[command(about = "Read, write and summarise VFP wing solver files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse one solver file and print it as JSON
    Parse {
        file: PathBuf,

        /// File kind, when it cannot be told from the name
        #[arg(short, long)]
        kind: Option<String>,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Convert chord-fraction GEO coordinates to physical ones
        #[arg(long)]
        denormalize: bool,

        /// Write the GEO file back out in the solver's column layout
        #[arg(long, value_name = "GEO")]
        rewrite: Option<PathBuf>,
    },

    /// Derive an angle-of-attack sweep from a flow condition file
    Sweep {
        /// Flow file named like `...M085Re19p8ma-1p00.dat`
        dat: PathBuf,

        /// Angle increment in degrees
        #[arg(long, allow_negative_numbers = true)]
        step: f64,

        /// Number of increments after the base angle
        #[arg(long)]
        count: usize,

        /// Directory for the generated files (defaults to `Flow_Conditions`
        /// next to the input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Do not flag trimmed members as continuation runs
        #[arg(long)]
        no_continuation: bool,
    },

    /// Parse every solver file in a case directory into one JSON bundle
    Bundle {
        dir: PathBuf,

        /// Only include files whose name matches this glob
        #[arg(short, long)]
        pattern: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tabulate level-1 forces and wave drag per angle of attack
    Summary {
        dir: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Configuration from `--config`, or the defaults
    pub fn load_config(&self) -> Result<VfpConfig> {
        match &self.config {
            Some(path) => VfpConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(VfpConfig::default()),
        }
    }
}

/// Set up structured logging
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vfp_formats={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the selected command
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    let config = args.load_config()?;
    let show_progress = args.show_progress();

    match args.command {
        Commands::Parse {
            file,
            kind,
            output,
            denormalize,
            rewrite,
        } => run_parse(&file, kind.as_deref(), output, denormalize, rewrite, &config),
        Commands::Sweep {
            dat,
            step,
            count,
            output_dir,
            no_continuation,
        } => {
            let config = if no_continuation {
                config.without_continuation()
            } else {
                config
            };
            run_sweep(&dat, step, count, output_dir, &config)
        }
        Commands::Bundle {
            dir,
            pattern,
            output,
        } => {
            let processor = CaseProcessor::new(dir)
                .with_config(config)
                .with_pattern(pattern)
                .with_progress(show_progress);
            run_bundle(processor, output).await
        }
        Commands::Summary { dir, json } => {
            let processor = CaseProcessor::new(dir)
                .with_config(config)
                .with_progress(show_progress);
            run_summary(processor, json).await
        }
    }
}

fn run_parse(
    file: &Path,
    kind: Option<&str>,
    output: Option<PathBuf>,
    denormalize: bool,
    rewrite: Option<PathBuf>,
    config: &VfpConfig,
) -> Result<()> {
    let kind = match kind {
        Some(name) => FileKind::from_name(name).with_context(|| {
            let known: Vec<&str> = FileKind::ALL.iter().map(FileKind::as_str).collect();
            format!("Unknown file kind '{name}'; expected one of {}", known.join(", "))
        })?,
        None => FileKind::from_path(file).with_context(|| {
            format!(
                "Cannot tell the kind of {} from its name; pass --kind",
                file.display()
            )
        })?,
    };
    info!("Parsing {} as {}", file.display(), kind);

    let mut parsed = parse_path(file, kind, config)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if denormalize || rewrite.is_some() {
        let ParsedFile::Geo(geometry) = parsed else {
            bail!("--denormalize and --rewrite only apply to GEO files");
        };
        let geometry = if denormalize {
            geo::denormalize(geometry)
        } else {
            geometry
        };
        if let Some(path) = rewrite {
            let text = geo::serialize(&geometry, &config.geo)
                .with_context(|| format!("Failed to write geometry to {}", path.display()))?;
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("  {} {}", "Wrote".bright_green(), path.display());
        }
        parsed = ParsedFile::Geo(geometry);
    }

    eprintln!(
        "  {} {}",
        format!("{kind}:").bright_cyan(),
        parsed.describe()
    );
    write_json(&parsed, output.as_deref())
}

fn run_sweep(
    dat: &Path,
    step: f64,
    count: usize,
    output_dir: Option<PathBuf>,
    config: &VfpConfig,
) -> Result<()> {
    let file_name = dat
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("{} has no file name", dat.display()))?;
    let base = FlowFileName::parse(&file_name)?;
    let file = flow::read(dat, &config.flow)?;

    let members = derive_sweep(
        &file,
        base.mach(),
        base.aoa(),
        step,
        count,
        &config.sweep,
        &config.flow,
    )?;

    let output_dir = output_dir.unwrap_or_else(|| {
        dat.parent()
            .unwrap_or_else(|| Path::new("."))
            .join(constants::flow::SWEEP_DIR)
    });
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    // Member 0 carries the input's own name
    let input = dat
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", dat.display()))?;
    let target = output_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", output_dir.display()))?;
    if let Some(member) = members
        .iter()
        .find(|m| target.join(m.file_name(&base)) == input)
    {
        bail!(
            "Sweep member at AoA {:.2} would overwrite {}; choose another --output-dir",
            member.aoa,
            dat.display()
        );
    }

    println!(
        "{}",
        format!(
            "Sweep from {} at Mach {:.4}",
            file_name,
            base.mach()
        )
        .bright_green()
        .bold()
    );
    for member in &members {
        let path = output_dir.join(member.file_name(&base));
        std::fs::write(&path, flow::serialize(&member.file))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let mut notes = Vec::new();
        if member.full {
            notes.push("all levels");
        }
        if member.continuation {
            notes.push("continuation");
        }
        if !member.substituted {
            notes.push("angle not replaced");
        }
        println!(
            "  {} {:>8.2}  {}  {}",
            "AoA".bright_cyan(),
            member.aoa,
            path.display(),
            notes.join(", ").bright_black()
        );
    }
    Ok(())
}

async fn run_bundle(processor: CaseProcessor, output: Option<PathBuf>) -> Result<()> {
    let (bundle, stats) = processor.process().await?;
    print_stats(&stats);

    let json = bundle.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("  {} {}", "Output:".bright_cyan(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn run_summary(processor: CaseProcessor, json: bool) -> Result<()> {
    let (rows, stats) = processor.summarize().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let cell = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.5}"));
    println!(
        "{}",
        format!(
            "{:<36} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "case", "aoa", "CL", "CD(VFP)", "CDi", "CDv", "CDw"
        )
        .bold()
    );
    for row in &rows {
        let forces = row.forces.clone().unwrap_or_default();
        println!(
            "{:<36} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9}",
            row.name,
            row.aoa.map_or_else(|| "-".to_string(), |a| format!("{a:.2}")),
            cell(forces.cl),
            cell(forces.cd_tot_vfp),
            cell(forces.cdi),
            cell(forces.cdv),
            cell(row.wave_drag.as_ref().and_then(|w| w.total)),
        );
    }
    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &ProcessingStats) {
    eprintln!(
        "  {} {} parsed, {} skipped, {} failed of {} files in {} ms",
        "Done:".bright_green(),
        stats.files_parsed.to_string().bright_white().bold(),
        stats.files_skipped,
        stats.files_failed,
        stats.files_discovered,
        stats.processing_time_ms
    );
    for failure in &stats.failures {
        eprintln!(
            "  {} {}: {}",
            "Failed".bright_red(),
            failure.path.display(),
            failure.reason
        );
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["vfp"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_get_log_level() {
        assert_eq!(args(&["summary", "."]).get_log_level(), "warn");
        assert_eq!(args(&["-v", "summary", "."]).get_log_level(), "info");
        assert_eq!(args(&["summary", ".", "-vv"]).get_log_level(), "debug");
        assert_eq!(args(&["-vvvv", "summary", "."]).get_log_level(), "trace");

        let quiet = args(&["-q", "summary", "."]);
        assert_eq!(quiet.get_log_level(), "error");
        assert!(!quiet.show_progress());
    }

    #[test]
    fn test_sweep_accepts_negative_step() {
        match args(&["sweep", "M085Re5ma+1p00.dat", "--step", "-0.5", "--count", "3"]).command {
            Commands::Sweep {
                step,
                count,
                no_continuation,
                ..
            } => {
                assert_eq!(step, -0.5);
                assert_eq!(count, 3);
                assert!(!no_continuation);
            }
            other => panic!("Expected sweep command, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = args(&["--config", "/nonexistent/vfp.json", "summary", "."]);
        assert!(args.load_config().is_err());
    }

    #[test]
    fn test_sweep_writes_member_files() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut lines = vec!["M085Re5p0 wing".to_string()];
        for number in 1..=2 {
            lines.push(format!("    2   0.8500   0.0000    1    0  {:>3}", 100 * number));
            lines.extend((1..15).map(|i| format!("  line {i}")));
        }
        let dat = temp_dir.path().join("M085Re5p0ma+0p00.dat");
        std::fs::write(&dat, lines.join("\n") + "\n").unwrap();

        let out = temp_dir.path().join("sweep");
        run_sweep(&dat, 1.0, 2, Some(out.clone()), &VfpConfig::default()).unwrap();

        for name in ["M085Re5p0ma+0p00.dat", "M085Re5p0ma+1p00.dat", "M085Re5p0ma+2p00.dat"] {
            let text = std::fs::read_to_string(out.join(name)).unwrap();
            let file = flow::parse(&text, &VfpConfig::default().flow).unwrap();
            let expected = if name.contains("+0p00") { 2 } else { 1 };
            assert_eq!(file.level_count(), expected, "{name}");
        }
    }

    fn three_level_flow() -> String {
        let mut lines = vec!["M085Re5p0 wing".to_string(), "    0".to_string()];
        for number in 1..=3 {
            lines.push(format!("    2   0.8500  -1.0000    1    0  {:>3}", 100 * number));
            lines.extend((1..15).map(|i| format!("  level {number} line {i}")));
        }
        lines.join("\n") + "\n"
    }

    #[test]
    fn test_sweep_leaves_input_untouched() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dat = temp_dir.path().join("M085Re5p0ma-1p00.dat");
        std::fs::write(&dat, three_level_flow()).unwrap();
        let before = std::fs::read(&dat).unwrap();

        run_sweep(&dat, 0.5, 4, None, &VfpConfig::default()).unwrap();

        assert_eq!(std::fs::read(&dat).unwrap(), before);
        let members = temp_dir.path().join("Flow_Conditions");
        for name in ["M085Re5p0ma-1p00.dat", "M085Re5p0ma+0p00.dat", "M085Re5p0ma+1p00.dat"] {
            assert!(members.join(name).is_file(), "{name}");
        }
        let first = std::fs::read_to_string(members.join("M085Re5p0ma-1p00.dat")).unwrap();
        let file = flow::parse(&first, &VfpConfig::default().flow).unwrap();
        assert_eq!(file.level_count(), 1);
    }

    #[test]
    fn test_sweep_into_input_directory_is_refused() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dat = temp_dir.path().join("M085Re5p0ma-1p00.dat");
        std::fs::write(&dat, three_level_flow()).unwrap();
        let before = std::fs::read(&dat).unwrap();

        let err = run_sweep(
            &dat,
            0.5,
            4,
            Some(temp_dir.path().to_path_buf()),
            &VfpConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("would overwrite"));
        assert_eq!(std::fs::read(&dat).unwrap(), before);
        assert!(!temp_dir.path().join("M085Re5p0ma+0p00.dat").exists());
    }
}
