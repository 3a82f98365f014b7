use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use dts_catalog::{build_catalog, load_fragments, CatalogError, NotationOptions, RelationTable};

/// Extract a catalog of the global API surface described by TypeScript
/// declaration fragments.
#[derive(Debug, Parser)]
#[command(name = "dtscat", version, about)]
struct Cli {
    /// Declaration fragments (.d.ts files) to catalog
    #[arg(value_name = "FRAGMENTS")]
    fragments: Vec<PathBuf>,

    /// Replace the bundled inheritance table with a JSON file
    /// ({"Name": {"parent": "P", "mixins": ["M"]}})
    #[arg(long, value_name = "FILE")]
    relations: Option<PathBuf>,

    /// Prefix every rendered type node with its raw kind name
    #[arg(long)]
    verbose_types: bool,

    /// Pretty-print the catalog document
    #[arg(long)]
    pretty: bool,
}

fn main() {
    let cli = Cli::parse();

    let relations = match &cli.relations {
        Some(path) => match RelationTable::from_json_file(path) {
            Ok(table) => table,
            Err(err) => {
                report_error(&format!(
                    "failed to load relations table {}: {err:#}",
                    path.display()
                ));
                process::exit(2);
            }
        },
        None => RelationTable::bundled(),
    };

    match run(&cli, &relations) {
        Ok(()) => {}
        Err(err) => {
            report_error(&err.to_string());
            // Startup failures (bad input set) exit distinctly from
            // mid-run contract violations
            process::exit(if err.is_startup() { 2 } else { 1 });
        }
    }
}

fn run(cli: &Cli, relations: &RelationTable) -> Result<(), CatalogError> {
    let fragments = load_fragments(&cli.fragments)?;

    let opts = NotationOptions {
        verbose: cli.verbose_types,
    };
    let catalog = build_catalog(&fragments, relations, opts)?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&catalog)
    } else {
        serde_json::to_string(&catalog)
    }
    .map_err(|err| CatalogError::Contract(format!("catalog failed to serialize: {err}")))?;

    println!("{rendered}");
    Ok(())
}

fn report_error(message: &str) {
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(&mut stderr, "error:");
    let _ = stderr.reset();
    let _ = writeln!(&mut stderr, " {message}");
}
