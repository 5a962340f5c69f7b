//! Veriscore CLI - Command-line interface for the trust scoring engine
//!
//! Commands:
//! - score: Score a behavior sample against a baseline profile
//! - baseline: Build a baseline profile from NDJSON trusted samples
//! - validate: Validate sample, baseline, or config JSON
//! - doctor: Diagnose engine configuration and input files

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use veriscore::baseline::BaselineBuilder;
use veriscore::config::EngineConfig;
use veriscore::decision::DecisionPolicy;
use veriscore::report::ReportEncoder;
use veriscore::types::{BaselineProfile, BehaviorSample};
use veriscore::{ENGINE_VERSION, PRODUCER_NAME};

/// Veriscore - Behavioral trust scoring engine
#[derive(Parser)]
#[command(name = "veriscore")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score behavioral login signals against a baseline profile", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a behavior sample against a baseline profile
    Score {
        /// Sample JSON file path (use - for stdin)
        #[arg(short, long)]
        sample: PathBuf,

        /// Baseline profile JSON file path
        #[arg(short, long)]
        baseline: PathBuf,

        /// Engine configuration JSON file (defaults to the reference table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Trust score required to grant access
        #[arg(long, default_value = "60")]
        threshold: u8,

        /// Pretty-print the report JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Build a baseline profile from NDJSON trusted samples
    Baseline {
        /// Input file path, one sample JSON per line (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output profile file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Rolling window size in samples
        #[arg(long, default_value = "5")]
        window: usize,
    },

    /// Validate sample, baseline, or config JSON
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// What the input is supposed to be
        #[arg(value_enum, long, default_value = "sample")]
        schema: SchemaKind,
    },

    /// Diagnose engine configuration and input files
    Doctor {
        /// Check a baseline profile file
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Check an engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    /// A single behavior sample
    Sample,
    /// A baseline profile
    Baseline,
    /// An engine configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliErrorBody::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Score {
            sample,
            baseline,
            config,
            threshold,
            pretty,
        } => cmd_score(&sample, &baseline, config.as_deref(), threshold, pretty),

        Commands::Baseline {
            input,
            output,
            window,
        } => cmd_baseline(&input, &output, window),

        Commands::Validate { input, schema } => cmd_validate(&input, schema),

        Commands::Doctor {
            baseline,
            config,
            json,
        } => cmd_doctor(baseline.as_deref(), config.as_deref(), json),
    }
}

fn cmd_score(
    sample_path: &Path,
    baseline_path: &Path,
    config_path: Option<&Path>,
    threshold: u8,
    pretty: bool,
) -> Result<(), CliError> {
    let sample: BehaviorSample = serde_json::from_str(&read_input(sample_path)?)?;
    let baseline = BaselineProfile::from_json(&read_input(baseline_path)?)?;

    let config = match config_path {
        Some(path) => {
            let config = EngineConfig::from_json(&read_input(path)?)?;
            config.validate()?;
            config
        }
        None => EngineConfig::default(),
    };

    let result = veriscore::score(&sample, &baseline, &config)?;
    let decision = DecisionPolicy::new(threshold).evaluate(&result);

    let encoder = ReportEncoder::new();
    let json = encoder.encode_to_json(&sample, result, decision, pretty)?;
    println!("{json}");

    Ok(())
}

fn cmd_baseline(input: &Path, output: &Path, window: usize) -> Result<(), CliError> {
    let input_data = read_input(input)?;
    let mut builder = BaselineBuilder::new(window);

    for (line_no, line) in input_data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let sample: BehaviorSample = serde_json::from_str(trimmed).map_err(|e| {
            CliError::Parse(format!("line {}: {e}", line_no + 1))
        })?;
        sample.validate()?;
        builder.push(sample);
    }

    let profile = builder.profile().ok_or(CliError::NoSamples)?;
    let json = profile.to_json()?;

    if output.to_string_lossy() == "-" {
        println!("{json}");
    } else {
        fs::write(output, json)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, schema: SchemaKind) -> Result<(), CliError> {
    let input_data = read_input(input)?;

    match schema {
        SchemaKind::Sample => {
            let sample: BehaviorSample = serde_json::from_str(&input_data)?;
            sample.validate()?;
            println!("Sample is valid.");
        }
        SchemaKind::Baseline => {
            BaselineProfile::from_json(&input_data)?;
            println!("Baseline profile is valid.");
        }
        SchemaKind::Config => {
            let config = EngineConfig::from_json(&input_data)?;
            config.validate()?;
            println!("Engine configuration is valid.");
        }
    }

    Ok(())
}

fn cmd_doctor(
    baseline: Option<&Path>,
    config: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{PRODUCER_NAME} version {ENGINE_VERSION}"),
    });

    let default_config = EngineConfig::default();
    checks.push(match default_config.validate() {
        Ok(()) => DoctorCheck {
            name: "reference_table".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Reference rule table valid ({} signals, {} points)",
                default_config.specs.len(),
                default_config.total_weight()
            ),
        },
        Err(e) => DoctorCheck {
            name: "reference_table".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    });

    if let Some(path) = config {
        checks.push(check_file(path, "config", |content| {
            let config = EngineConfig::from_json(content)?;
            config.validate()?;
            Ok(format!(
                "Configuration valid ({} signals, {} points)",
                config.specs.len(),
                config.total_weight()
            ))
        }));
    }

    if let Some(path) = baseline {
        checks.push(check_file(path, "baseline", |content| {
            let profile = BaselineProfile::from_json(content)?;
            let hashes = profile.device_hash.is_some() as u8 + profile.location_hash.is_some() as u8;
            Ok(format!("Baseline profile valid ({hashes}/2 digests recorded)"))
        }));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready for - inputs)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Veriscore Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(path: &Path) -> Result<String, CliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn check_file(
    path: &Path,
    name: &str,
    validate: impl Fn(&str) -> Result<String, CliError>,
) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: format!("{} file does not exist", path.display()),
        };
    }
    match fs::read_to_string(path) {
        Ok(content) => match validate(&content) {
            Ok(message) => DoctorCheck {
                name: name.to_string(),
                status: CheckStatus::Ok,
                message,
            },
            Err(e) => DoctorCheck {
                name: name.to_string(),
                status: CheckStatus::Error,
                message: e.message(),
            },
        },
        Err(e) => DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: format!("Cannot read file: {e}"),
        },
    }
}

// Error types

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Engine(veriscore::ScoreError),
    Json(serde_json::Error),
    Parse(String),
    NoSamples,
    DoctorFailed,
}

impl CliError {
    fn message(&self) -> String {
        match self {
            CliError::Io(e) => e.to_string(),
            CliError::Engine(e) => e.to_string(),
            CliError::Json(e) => e.to_string(),
            CliError::Parse(msg) => msg.clone(),
            CliError::NoSamples => "No samples found in input".to_string(),
            CliError::DoctorFailed => "One or more health checks failed".to_string(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<veriscore::ScoreError> for CliError {
    fn from(e: veriscore::ScoreError) -> Self {
        CliError::Engine(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliErrorBody {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliError> for CliErrorBody {
    fn from(e: CliError) -> Self {
        match e {
            CliError::Io(e) => CliErrorBody {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliError::Engine(e) => CliErrorBody {
                code: "INVALID_INPUT".to_string(),
                message: e.to_string(),
                hint: Some("Run 'veriscore validate' on the input files".to_string()),
            },
            CliError::Json(e) => CliErrorBody {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliError::Parse(msg) => CliErrorBody {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Input must be one sample JSON object per line".to_string()),
            },
            CliError::NoSamples => CliErrorBody {
                code: "NO_SAMPLES".to_string(),
                message: "No samples found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CliError::DoctorFailed => CliErrorBody {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
