//! # nephro
//!
//! A CLI tool for extracting glomerulus and podocyte data from kidney biopsy
//! image exports.
//!
//! ## Overview
//!
//! nephro is built on top of nephrolib. It walks a directory of biopsies
//! (one subdirectory per biopsy, one `.xls` export per image), groups every
//! podocyte under its glomerulus, and prints a summary or the full result.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize every biopsy under a root directory
//! nephro /data/biopsies
//!
//! # One biopsy, one row per image
//! nephro biopsy /data/biopsies/B-0142
//!
//! # One image export
//! nephro image /data/biopsies/B-0142/3.xls
//!
//! # Full result as JSON, skipping invalid files
//! nephro /data/biopsies --output json --skip-invalid
//! ```

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use nephrolib::source::{biopsy_id_from_dir, image_id_from_path};
use nephrolib::{
    extract_biopsy, extract_image_file, extract_root, ErrorPolicy, ExtractOptions, FilterConfig,
    SummaryTable,
};
use render::{render_result, OutputMode};
use tracing_subscriber::EnvFilter;

/// Arguments shared by every command
fn common_args() -> Vec<Arg> {
    vec![
        Arg::new("ext")
            .long("ext")
            .global(true)
            .default_value(nephrolib::source::DEFAULT_EXTENSION)
            .help("Extension of image export files"),
        Arg::new("include")
            .short('i')
            .long("include")
            .global(true)
            .action(ArgAction::Append)
            .help("Include files matching glob pattern"),
        Arg::new("exclude")
            .short('e')
            .long("exclude")
            .global(true)
            .action(ArgAction::Append)
            .help("Exclude files matching glob pattern"),
        Arg::new("on-error")
            .long("on-error")
            .global(true)
            .default_value("abort")
            .value_parser(["abort", "skip"])
            .help("What to do when an image file fails to extract"),
        Arg::new("skip-invalid")
            .long("skip-invalid")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Shorthand for --on-error skip"),
        Arg::new("by-image")
            .long("by-image")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Show one row per image"),
        Arg::new("output")
            .short('o')
            .long("output")
            .global(true)
            .default_value("table")
            .value_parser(["table", "text", "json"])
            .help("Output format (table is styled on terminals, text never is)"),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .global(true)
            .action(ArgAction::Count)
            .help("Increase log verbosity (-v info, -vv debug)"),
    ]
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("nephro")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract glomerulus and podocyte measurements from biopsy image exports")
        .arg(
            Arg::new("path")
                .help("Root directory with one subdirectory per biopsy")
                .default_value("."),
        )
        .args(common_args())
        .subcommand(
            Command::new("root")
                .about("Extract every biopsy under a root directory (default command)")
                .arg(
                    Arg::new("path")
                        .help("Root directory")
                        .default_value("."),
                ),
        )
        .subcommand(
            Command::new("biopsy")
                .about("Extract a single biopsy directory")
                .arg(
                    Arg::new("path")
                        .help("Biopsy directory")
                        .required(true),
                )
                .arg(
                    Arg::new("id")
                        .long("id")
                        .help("Biopsy id (defaults to the directory name)"),
                ),
        )
        .subcommand(
            Command::new("image")
                .about("Extract a single image export file")
                .arg(Arg::new("path").help("Image export file").required(true))
                .arg(
                    Arg::new("image-id")
                        .long("image-id")
                        .value_parser(value_parser!(u32))
                        .help("Image id (defaults to the file name)"),
                ),
        )
}

/// Build extraction options from matches
fn build_options(matches: &ArgMatches) -> anyhow::Result<ExtractOptions> {
    let mut filter = FilterConfig::new();

    if let Some(ext) = matches.get_one::<String>("ext") {
        filter = filter.extension(ext);
    }
    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }
    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    let policy = if matches.get_flag("skip-invalid") {
        ErrorPolicy::Skip
    } else {
        matches
            .get_one::<String>("on-error")
            .map(|s| s.parse::<ErrorPolicy>())
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or_default()
    };

    Ok(ExtractOptions::new().filter(filter).on_error(policy))
}

fn output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("output")
        .map(|s| match s.as_str() {
            "json" => OutputMode::Json,
            "text" => OutputMode::Text,
            _ => OutputMode::Auto,
        })
        .unwrap_or(OutputMode::Auto)
}

fn path_arg(matches: &ArgMatches) -> PathBuf {
    PathBuf::from(
        matches
            .get_one::<String>("path")
            .map(|s| s.as_str())
            .unwrap_or("."),
    )
}

/// Handler for the root command
fn root_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let path = path_arg(matches);
    let options = build_options(matches)?;

    tracing::debug!(
        root = %path.display(),
        extension = %options.file_filter.extension,
        policy = ?options.error_policy,
        "extracting root"
    );
    let result = extract_root(&path, &options)?;

    let by_image = matches.get_flag("by-image");
    render_result(
        &result,
        || {
            if by_image {
                SummaryTable::by_image_all(&result)
            } else {
                SummaryTable::by_biopsy(&result)
            }
        },
        output_mode(matches),
    )
}

/// Handler for the biopsy command
fn biopsy_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let path = path_arg(matches);
    let options = build_options(matches)?;
    let id = matches
        .get_one::<String>("id")
        .cloned()
        .unwrap_or_else(|| biopsy_id_from_dir(canonical_or(&path)));

    tracing::debug!(
        biopsy = %id,
        dir = %path.display(),
        policy = ?options.error_policy,
        "extracting biopsy"
    );
    let result = extract_biopsy(id, &path, &options)?;

    render_result(
        &result,
        || SummaryTable::by_image(&result),
        output_mode(matches),
    )
}

/// Handler for the image command
fn image_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let path = path_arg(matches);
    let image_id = match matches.get_one::<u32>("image-id") {
        Some(id) => *id,
        None => image_id_from_path(&path)?,
    };

    tracing::debug!(file = %path.display(), image_id, "extracting image");
    let result = extract_image_file(&path, image_id).map_err(|e| e.in_file(&path))?;

    render_result(
        &result,
        || SummaryTable::by_glomerulus(&result),
        output_mode(matches),
    )
}

/// `.` and similar paths have no final component; resolve them first.
fn canonical_or(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nephrolib={level},nephro={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    match matches.subcommand() {
        Some(("root", sub)) => root_handler(sub),
        Some(("biopsy", sub)) => biopsy_handler(sub),
        Some(("image", sub)) => image_handler(sub),
        // No subcommand - treat as root
        _ => root_handler(matches),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
