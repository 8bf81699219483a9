use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use docparse::{
    DocumentParser,
    cachingparser::{CachingParser, default_cache_path},
    tabulaparser::TabulaParser,
    textparser::TextLayoutParser,
};
use engine::{
    clock::SystemClock,
    dataset::Dataset,
    extract::{FundOptions, extract_funds, extract_tables},
    lookup::{IdentifierLookup, as_of_year},
    numeric::NumberFormat,
    spec::Specification,
    table::RawTable,
};
use hashbrown::HashMap;
use lookup::{LookupEvent, LookupEvents, ictax::IctaxLookup};
use simple_bar::ProgressBar;

use crate::{
    distpaths,
    output::{SheetFormat, default_out_path},
    specselect::SpecSelector,
};

/// Extracts the tables described by a specification from a PDF into a
/// spreadsheet.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to input PDF.
    pdf_path: PathBuf,

    /// Specification to apply: the number of a bundled specification (as
    /// listed by the `specs` subcommand) or the path to a YAML file.
    #[arg(long, default_value_t)]
    spec: SpecSelector,

    /// Directory holding the bundled specifications. Defaults to the
    /// `specs` directory next to the executable.
    #[arg(long)]
    specs_dir: Option<PathBuf>,

    /// Backend used to find tables in the PDF.
    #[arg(long, value_enum, default_value_t = Backend::Tabula)]
    backend: Backend,

    /// Path to the Tabula JAR file. Defaults to `tabula.jar` next to the
    /// executable.
    #[arg(long)]
    tabula_libpath: Option<PathBuf>,

    /// File format of the output sheet.
    #[arg(long, value_enum, default_value_t)]
    format: SheetFormat,

    /// Path of the output file. Defaults to the PDF path with the extension
    /// of --format.
    #[arg(long)]
    out_path: Option<PathBuf>,

    /// Parse the PDF again even if its tables are cached.
    #[arg(long)]
    force: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Backend {
    /// Tabula running in an embedded JVM.
    Tabula,
    /// Heuristic table detection over the PDF's text layout.
    Text,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Writes the combined tables as they are.
    Tables,
    /// Normalizes numbers and appends security attributes looked up by ISIN.
    Funds(FundsArgs),
}

#[derive(Args, Debug)]
struct FundsArgs {
    /// Thousand separator used by numbers in the PDF.
    #[arg(long, default_value_t = '\'')]
    thousand_separator: char,

    /// Decimal separator used by numbers in the PDF.
    #[arg(long, default_value_t = '.')]
    decimal_separator: char,

    /// Skip querying the lookup service. Attribute columns are still
    /// written, with every value unresolved.
    #[arg(long)]
    no_lookup: bool,

    /// Year to look up attributes for. Defaults to the previous calendar
    /// year.
    #[arg(long)]
    year: Option<i32>,

    /// Display width of the "Name" column.
    #[arg(long, default_value_t = 40)]
    name_width: usize,
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let specs_dir = cmd.specs_dir.clone().or_else(distpaths::specs_dir);
    let spec_path = cmd.spec.resolve(specs_dir.as_deref())?;
    let spec = engine::spec::load(&spec_path)?;

    let tables = parse_document(cmd)?;
    log::info!("Found {} tables in {:?}", tables.len(), cmd.pdf_path);

    let out_path = cmd
        .out_path
        .clone()
        .unwrap_or_else(|| default_out_path(&cmd.pdf_path, cmd.format));

    let (dataset, sheet_name, widths) = match &cmd.mode {
        Mode::Tables => (extract_tables(&tables, &spec), "Tables", HashMap::new()),
        Mode::Funds(args) => (
            funds(&tables, &spec, args)?,
            "Funds",
            HashMap::from([("Name".to_string(), args.name_width)]),
        ),
    };

    cmd.format
        .writer()
        .write(&dataset, &out_path, sheet_name, &widths)
        .with_context(|| format!("writing output to {out_path:?}"))?;
    eprintln!("Wrote {} rows to {:?}.", dataset.num_rows(), out_path);

    Ok(())
}

fn parse_document(cmd: &Command) -> Result<Vec<RawTable>> {
    let backend: Box<dyn DocumentParser> = match cmd.backend {
        Backend::Tabula => {
            let libpath = cmd
                .tabula_libpath
                .clone()
                .or_else(distpaths::tabula_jar)
                .with_context(|| "no Tabula JAR found, pass --tabula-libpath")?;
            Box::new(TabulaParser::new(&libpath)?)
        }
        Backend::Text => Box::new(TextLayoutParser::new()),
    };

    let parser = CachingParser::load(backend, default_cache_path(&cmd.pdf_path), cmd.force);
    let parsed = parser
        .parse(&cmd.pdf_path)
        .with_context(|| format!("reading tables from {:?}", cmd.pdf_path));

    if let Err(err) = Box::new(parser).close() {
        log::warn!("Failed to shut down document parser: {err:#}");
    }

    parsed
}

fn funds(tables: &[RawTable], spec: &Specification, args: &FundsArgs) -> Result<Dataset> {
    let options = FundOptions {
        number_format: NumberFormat::new(
            Some(args.thousand_separator),
            Some(args.decimal_separator),
        ),
        as_of_year: as_of_year(&SystemClock::new(), args.year),
    };

    let mut ictax = if args.no_lookup {
        None
    } else {
        Some(IctaxLookup::connect(Box::new(EventDisplayer::default()))?)
    };
    let lookup = ictax
        .as_mut()
        .map(|ictax| ictax as &mut dyn IdentifierLookup);

    extract_funds(tables, spec, lookup, &options)
        .with_context(|| "merging looked up attributes into the extracted tables")
}

#[derive(Default)]
struct EventDisplayer {
    progress_bar: Option<ProgressBar>,
}

impl LookupEvents for EventDisplayer {
    fn on_event(&mut self, event: LookupEvent) {
        match event {
            LookupEvent::Progress {
                identifier,
                resolved,
                completed: _,
                total,
            } => {
                if !resolved {
                    log::warn!("Could not look up {identifier}.");
                }
                self.progress_bar
                    .get_or_insert_with(|| ProgressBar::cargo_style(bar_length(total), 80, true))
                    .update();
            }
            LookupEvent::Completed => {
                eprintln!("Lookup complete.");
            }
        }
    }
}

/// Progress bar length for `total` steps, saturating at the bar's limit.
fn bar_length(total: usize) -> u32 {
    u32::try_from(total).unwrap_or(u32::MAX)
}
