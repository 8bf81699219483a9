use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;
use engine::dataset::Dataset;
use hashbrown::HashMap;

mod csvsheet;
mod xlsxsheet;

pub use csvsheet::CsvSheetWriter;
pub use xlsxsheet::XlsxSheetWriter;

/// Writes a [Dataset] as a single named sheet.
pub trait SheetWriter {
    /// Writes `dataset` to `path`. `widths` maps column labels to display
    /// widths in characters.
    fn write(
        &self,
        dataset: &Dataset,
        path: &Path,
        sheet_name: &str,
        widths: &HashMap<String, usize>,
    ) -> Result<()>;
}

/// File format of the written sheet.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SheetFormat {
    /// Excel workbook with a single named sheet.
    #[default]
    Xlsx,
    /// Comma separated values.
    Csv,
}

impl SheetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SheetFormat::Xlsx => "xlsx",
            SheetFormat::Csv => "csv",
        }
    }

    pub fn writer(self) -> Box<dyn SheetWriter> {
        match self {
            SheetFormat::Xlsx => Box::new(XlsxSheetWriter),
            SheetFormat::Csv => Box::new(CsvSheetWriter),
        }
    }
}

/// Output path used when none is given: the PDF path with the extension of
/// `format`.
pub fn default_out_path(pdf_path: &Path, format: SheetFormat) -> PathBuf {
    pdf_path.with_extension(format.extension())
}
