//! Excalidraw Skeleton CLI
//!
//! Usage:
//!   excalidraw-skeleton [OPTIONS] <INPUT> [OUTPUT]
//!   excalidraw-skeleton --stdin [OUTPUT]
//!   excalidraw-skeleton --modify <EXISTING> <INPUT> [OUTPUT]
//!
//! Options:
//!   --stdin                  Read skeleton JSON from stdin
//!   -m, --modify <EXISTING>  Merge into an existing .excalidraw file
//!   -s, --stylesheet <FILE>  Theme table overrides (TOML format)
//!   --seed <N>               Reproducible ids and seeds
//!   -v, --verbose            Log layout and merge decisions
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use serde_json::json;
use thiserror::Error;
use tracing::Level;

use excalidraw_skeleton::stylesheet::StylesheetError;
use excalidraw_skeleton::{
    convert_with_tokens, ConvertConfig, ConvertError, RandomTokens, Stylesheet, TokenSource,
};

const OUTPUT_EXTENSION: &str = ".excalidraw";
const STDIN_OUTPUT: &str = "output.excalidraw";

#[derive(Parser)]
#[command(name = "excalidraw-skeleton")]
#[command(about = "Expand diagram skeletons into Excalidraw documents")]
struct Cli {
    /// Skeleton JSON file (with --stdin, this is the output path)
    input: Option<PathBuf>,

    /// Output file (defaults to the input path with an .excalidraw extension)
    output: Option<PathBuf>,

    /// Read skeleton JSON from stdin
    #[arg(long)]
    stdin: bool,

    /// Merge into an existing .excalidraw file (output defaults to it)
    #[arg(short, long, value_name = "EXISTING")]
    modify: Option<PathBuf>,

    /// Theme table overrides (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Seed for reproducible ids and seeds
    #[arg(long)]
    seed: Option<u64>,

    /// Log layout and merge decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Error reading {what} '{}': {source}", path.display())]
    Read {
        what: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Error reading from stdin: {0}")]
    Stdin(io::Error),

    #[error("Error printing usage: {0}")]
    Usage(io::Error),

    #[error("Error loading stylesheet '{}': {source}", path.display())]
    Stylesheet {
        path: PathBuf,
        source: StylesheetError,
    },

    #[error("Error writing '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Error serializing document: {0}")]
    Serialize(serde_json::Error),

    #[error("{error}")]
    Convert {
        error: ConvertError,
        source_text: String,
        filename: String,
    },
}

impl CliError {
    /// Failure payload written to stderr
    fn payload(&self) -> serde_json::Value {
        let mut payload = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let CliError::Convert {
            error,
            source_text,
            filename,
        } = self
        {
            match error {
                ConvertError::Syntax(_) | ConvertError::Schema(_) => {
                    payload["report"] = json!(error.format(source_text, filename));
                }
                ConvertError::Validation(messages) => payload["errors"] = json!(messages),
                ConvertError::PriorDocument(_) => {}
            }
        }
        payload
    }
}

/// Where the skeleton comes from and where the document goes
struct Plan {
    input: Option<PathBuf>,
    existing: Option<PathBuf>,
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.input.is_none() && !cli.stdin {
        // Nothing to convert; show usage like --help does
        if let Err(e) = Cli::command().print_help() {
            fail(CliError::Usage(e));
        }
        return;
    }

    match run(&cli) {
        Ok(summary) => println!("{summary}"),
        Err(e) => fail(e),
    }
}

fn fail(error: CliError) -> ! {
    eprintln!("{}", error.payload());
    std::process::exit(1);
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn plan(cli: &Cli) -> Plan {
    let (input, existing, output) = if cli.stdin {
        let output = cli.output.clone().or_else(|| cli.input.clone());
        (None, cli.modify.clone(), output)
    } else {
        (cli.input.clone(), cli.modify.clone(), cli.output.clone())
    };

    let output = output
        .or_else(|| existing.clone())
        .or_else(|| input.as_deref().map(default_output))
        .unwrap_or_else(|| PathBuf::from(STDIN_OUTPUT));

    Plan {
        input,
        existing,
        output: with_extension(output),
    }
}

/// `diagram.json` becomes `diagram.excalidraw`
fn default_output(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    match name.strip_suffix(".json") {
        Some(stem) => PathBuf::from(format!("{stem}{OUTPUT_EXTENSION}")),
        None => input.to_path_buf(),
    }
}

fn with_extension(path: PathBuf) -> PathBuf {
    let name = path.to_string_lossy();
    if name.ends_with(OUTPUT_EXTENSION) {
        path
    } else {
        PathBuf::from(format!("{name}{OUTPUT_EXTENSION}"))
    }
}

fn read_file(what: &'static str, path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        what,
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: &Cli) -> Result<serde_json::Value, CliError> {
    let plan = plan(cli);

    let stylesheet = match &cli.stylesheet {
        Some(path) => Stylesheet::from_file(path).map_err(|source| CliError::Stylesheet {
            path: path.clone(),
            source,
        })?,
        None => Stylesheet::default(),
    };

    let (source, filename) = match &plan.input {
        Some(path) => (read_file("skeleton file", path)?, path.display().to_string()),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Stdin)?;
            (buffer, "<stdin>".to_string())
        }
    };
    let existing = plan
        .existing
        .as_deref()
        .map(|path| read_file("existing file", path))
        .transpose()?;

    let mut tokens: Box<dyn TokenSource> = match cli.seed {
        Some(seed) => Box::new(RandomTokens::seeded(seed)),
        None => Box::new(RandomTokens::thread()),
    };
    let config = ConvertConfig::new().with_stylesheet(stylesheet);
    let output = convert_with_tokens(&source, existing.as_deref(), &config, tokens.as_mut())
        .map_err(|error| CliError::Convert {
            error,
            source_text: source.clone(),
            filename: filename.clone(),
        })?;

    let rendered = serde_json::to_string_pretty(&output.document).map_err(CliError::Serialize)?;
    let write_error = |source| CliError::Write {
        path: plan.output.clone(),
        source,
    };
    if let Some(parent) = plan.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(&plan.output, rendered).map_err(write_error)?;

    let resolved = fs::canonicalize(&plan.output).unwrap_or_else(|_| plan.output.clone());
    let element_count = output.document.element_count();
    Ok(json!({
        "success": true,
        "outputPath": resolved.display().to_string(),
        "elementCount": element_count,
        "message": format!("Wrote {element_count} elements to {}", resolved.display()),
    }))
}
