// scm-gen - confusion matrix generator for delimited label files

mod exit_codes;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scm_engine::config::parse_label_list;
use scm_engine::{GenerateConfig, LabelOrder, MatrixError, MatrixType, OutputFormat};
use scm_io::{IoError, LoadOptions};

use exit_codes::{io_exit_code, matrix_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser, Debug)]
#[command(name = "scm-gen")]
#[command(about = "Generates a confusion matrix from a CSV file with actual/predicted label columns.")]
#[command(version)]
#[command(long_version = long_version())]
#[command(after_help = "\
Examples:
  scm-gen -i predictions.csv
  scm-gen -i predictions.csv -t percentages_per_row -D 2
  scm-gen -i predictions.csv -a 3 -p 4 -w 5 -o matrix.csv
  scm-gen -i predictions.csv -l cat,dog,bird -O text -o matrix.txt
  scm-gen -i predictions.tsv -d $'\\t' -H
  scm-gen -c matrix.toml -i other.csv")]
struct Cli {
    /// The CSV file to load the actual/predicted labels from
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// TOML file with default settings; command-line flags take precedence
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// The column delimiter in the CSV file [default: ,]
    #[arg(short = 'd', long = "delimiter", value_name = "DELIMITER")]
    delimiter: Option<char>,

    /// The quote character to use in the CSV file [default: "]
    #[arg(short = 'q', long = "quotechar", value_name = "CHAR")]
    quotechar: Option<char>,

    /// The CSV file has no header row
    #[arg(short = 'H', long = "no_header", alias = "no-header")]
    no_header: bool,

    /// The optional file to write the generated matrix to (plain text on stdout otherwise)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// The output format when writing to a file: csv or text [default: csv]
    #[arg(short = 'O', long = "output_format", alias = "output-format", value_name = "FORMAT")]
    output_format: Option<OutputFormat>,

    /// The 1-based column index for the actual/ground truth labels [default: 1]
    #[arg(short = 'a', long = "actual", value_name = "COL")]
    actual: Option<usize>,

    /// The prefix for the labels in the 'actual' column [default: "a: "]
    #[arg(short = 'A', long = "actual_prefix", alias = "actual-prefix", value_name = "PREFIX")]
    actual_prefix: Option<String>,

    /// The 1-based column index for the predicted labels [default: 2]
    #[arg(short = 'p', long = "predicted", value_name = "COL")]
    predicted: Option<usize>,

    /// The prefix for the labels in the 'predicted' row [default: "p: "]
    #[arg(short = 'P', long = "predicted_prefix", alias = "predicted-prefix", value_name = "PREFIX")]
    predicted_prefix: Option<String>,

    /// The 1-based column index for the weight of each prediction
    #[arg(short = 'w', long = "weight", value_name = "COL")]
    weight: Option<usize>,

    /// Comma-separated list of labels to use, in this order (eg if not all labels are present in the file)
    #[arg(short = 'l', long = "labels", value_name = "LABELS")]
    labels: Option<String>,

    /// Order of labels inferred from the data: first_seen or sorted [default: first_seen]
    #[arg(long = "label_order", alias = "label-order", value_name = "ORDER")]
    label_order: Option<LabelOrder>,

    /// The text to print in the top-left corner [default: x]
    #[arg(short = 'C', long = "corner", value_name = "CORNER")]
    corner: Option<String>,

    /// Maximum number of decimals (0-17) for fractional values, -1 for no limit [default: 3]
    #[arg(
        short = 'D',
        long = "max_decimals",
        alias = "max-decimals",
        value_name = "NUM",
        allow_negative_numbers = true
    )]
    max_decimals: Option<i32>,

    /// The type of matrix: counts, percentages or percentages_per_row [default: counts]
    #[arg(short = 't', long = "matrix_type", alias = "matrix-type", value_name = "TYPE")]
    matrix_type: Option<MatrixType>,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long = "quiet")]
    quiet: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("SCM_GIT_COMMIT"), ")",
        "\nengine:  scm-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("SCM_TARGET"),
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<MatrixError> for CliError {
    fn from(err: MatrixError) -> Self {
        let hint = match &err {
            MatrixError::UnknownLabel { .. } => {
                Some("add the label to --labels, or omit --labels to infer labels from the data")
            }
            MatrixError::EmptyLabels => Some("the input has no data rows"),
            MatrixError::DuplicateLabel(_) => Some("each label may appear only once in --labels"),
            _ => None,
        };
        Self {
            code: matrix_exit_code(&err),
            message: err.to_string(),
            hint: hint.map(String::from),
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let hint = match &err {
            IoError::MissingColumn { .. } => Some("check --delimiter and the column indices (-a, -p, -w)"),
            _ => None,
        };
        Self {
            code: io_exit_code(&err),
            message: err.to_string(),
            hint: hint.map(String::from),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cmd_generate(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// ============================================================================
// generate
// ============================================================================

fn cmd_generate(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(cli)?;

    let input = config
        .input
        .as_deref()
        .ok_or_else(|| {
            CliError::args("no input file")
                .with_hint("pass -i FILE or set `input` in the config file")
        })?
        .to_string();

    let options = LoadOptions::from_config(&config)?;
    let observations = scm_io::load(Path::new(&input), &options)?;
    debug!(observations = observations.len(), input = %input, "input loaded");

    let rendered = scm_engine::run(&config, &observations)?;

    match config.output {
        Some(ref output) => {
            scm_io::persist(
                &rendered,
                Path::new(output),
                config.output_format,
                config.delimiter_byte()?,
                config.quote_byte()?,
            )?;
            info!(
                matrix_type = %config.matrix_type,
                labels = rendered.row_headers.len(),
                "wrote {}",
                output
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.to_text().as_bytes())
                .map_err(|e| CliError::io(e.to_string()))?;
        }
    }

    Ok(())
}

/// Defaults, then the config file (if any), then explicit flags.
fn resolve_config(cli: Cli) -> Result<GenerateConfig, CliError> {
    let mut config = match cli.config {
        Some(ref path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::io(format!("cannot read config '{}': {e}", path.display()))
            })?;
            debug!(path = %path.display(), "loaded config file");
            GenerateConfig::from_toml(&text)?
        }
        None => GenerateConfig::default(),
    };

    if let Some(input) = cli.input {
        config.input = Some(input.display().to_string());
    }
    if let Some(output) = cli.output {
        config.output = Some(output.display().to_string());
    }
    if let Some(format) = cli.output_format {
        config.output_format = format;
    }
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(quotechar) = cli.quotechar {
        config.quotechar = quotechar;
    }
    if cli.no_header {
        config.header = false;
    }
    if let Some(col) = cli.actual {
        config.actual_column = col;
    }
    if let Some(col) = cli.predicted {
        config.predicted_column = col;
    }
    if let Some(col) = cli.weight {
        config.weight_column = Some(col);
    }
    if let Some(prefix) = cli.actual_prefix {
        config.actual_prefix = prefix;
    }
    if let Some(prefix) = cli.predicted_prefix {
        config.predicted_prefix = prefix;
    }
    if let Some(labels) = cli.labels {
        config.labels = Some(parse_label_list(&labels));
    }
    if let Some(order) = cli.label_order {
        config.label_order = order;
    }
    if let Some(corner) = cli.corner {
        config.corner = corner;
    }
    if let Some(max_decimals) = cli.max_decimals {
        config.max_decimals = max_decimals;
    }
    if let Some(matrix_type) = cli.matrix_type {
        config.matrix_type = matrix_type;
    }

    config.validate()?;
    Ok(config)
}
