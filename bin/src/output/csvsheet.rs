use std::path::Path;

use anyhow::{Context, Result};
use engine::dataset::Dataset;
use hashbrown::HashMap;

use super::SheetWriter;

/// Writes sheets as CSV files. CSV has no notion of sheet names or column
/// widths, so those are only logged.
#[derive(Debug, Default)]
pub struct CsvSheetWriter;

impl SheetWriter for CsvSheetWriter {
    fn write(
        &self,
        dataset: &Dataset,
        path: &Path,
        sheet_name: &str,
        widths: &HashMap<String, usize>,
    ) -> Result<()> {
        log::info!(
            "Writing sheet {sheet_name:?} with {} rows to {path:?}",
            dataset.num_rows()
        );
        for (label, width) in widths {
            if dataset.columns().contains(label) {
                log::debug!("Column {label:?} display width {width} not representable in CSV");
            }
        }

        let mut output = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(path)
            .with_context(|| format!("opening CSV writer for {path:?}"))?;

        output
            .write_record(dataset.labels())
            .context("writing header row")?;
        for (row_index, row) in dataset.rows().iter().enumerate() {
            output
                .write_record(row.iter().map(ToString::to_string))
                .with_context(|| format!("writing row index {row_index}"))?;
        }

        output.flush().context("flushing CSV output")?;
        Ok(())
    }
}
