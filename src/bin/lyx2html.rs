//! Command-line interface for lyx-html
//! Converts a LyX document into an HTML page, or dumps its postprocessed tree.
//!
//! Usage:
//!   lyx2html `<path>` [--output `<file>`] [--format html|json] [--config `<file>`] [--raw]
//!
//! Diagnostics go to stderr. Set `RUST_LOG=debug` to follow the conversion stages.

use clap::{Arg, ArgAction, Command};
use lyx_html::lyx::formats::FormatRegistry;
use lyx_html::lyx::loader::{DocumentLoader, LoaderError};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let matches = Command::new("lyx2html")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert LyX documents to HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the .lyx file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write to this file instead of stdout"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format ('html' or 'json')")
                .default_value("html"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("YAML options file layered over the defaults"),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Emit only the body, without the page around it")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let Some(path) = matches.get_one::<String>("path") else {
        return;
    };
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("html");
    let config = matches.get_one::<String>("config").map(PathBuf::from);
    let output = matches.get_one::<String>("output").map(PathBuf::from);

    if let Err(e) = handle_convert_command(
        path,
        format,
        config,
        matches.get_flag("raw"),
        output,
    ) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Handle a conversion
fn handle_convert_command(
    path: &str,
    format: &str,
    config: Option<PathBuf>,
    raw: bool,
    output: Option<PathBuf>,
) -> Result<(), LoaderError> {
    let registry = FormatRegistry::with_defaults();
    if !registry.has(format) {
        eprintln!("Unknown format '{}'. Available formats:", format);
        for name in registry.list_formats() {
            eprintln!("  {}", name);
        }
        std::process::exit(1);
    }

    let mut loader = DocumentLoader::from_path(path)?;
    if let Some(config) = config {
        loader = loader.with_config_file(config)?;
    }
    if raw {
        loader.options_mut().raw = true;
    }

    let document = loader.parse()?;
    for diagnostic in document.diagnostics().iter() {
        eprint!("{}", diagnostic.describe(path, loader.source()));
    }
    let rendered = registry.serialize(&document, format)?;

    match output {
        Some(file) => {
            std::fs::write(&file, rendered)?;
            log::info!("wrote {}", file.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
