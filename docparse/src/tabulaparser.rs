use std::path::Path;

use anyhow::{Context, Result};
use engine::table::{RawTable, Row};
use serde::Deserialize;

use crate::DocumentParser;

#[derive(Deserialize, Debug)]
#[serde(transparent)]
struct JsonTableSet(Vec<JsonTable>);

#[derive(Deserialize, Debug)]
struct JsonTable {
    page_number: i32,
    data: Vec<JsonRow>,
}

#[derive(Deserialize, Debug)]
struct JsonRow(Vec<JsonCell>);

#[derive(Deserialize, Debug)]
struct JsonCell {
    text: String,
}

impl JsonRow {
    fn into_row(self) -> Row {
        Row(self.0.into_iter().map(|cell| cell.text).collect())
    }
}

/// Parses tables with Tabula running in an embedded JVM.
pub struct TabulaParser {
    vm: tabula::TabulaVM,
}

impl TabulaParser {
    /// Starts the JVM with the Tabula JAR at `libpath` on its classpath.
    pub fn new(libpath: &Path) -> Result<Self> {
        let libpath = libpath
            .to_str()
            .with_context(|| format!("Tabula library path {libpath:?} is not valid UTF-8"))?;
        let vm = tabula::TabulaVM::new(libpath, false)
            .with_context(|| format!("starting Tabula VM with {libpath:?}"))?;
        Ok(Self { vm })
    }
}

impl DocumentParser for TabulaParser {
    fn name(&self) -> &'static str {
        "tabula"
    }

    fn parse(&self, pdf_path: &Path) -> Result<Vec<RawTable>> {
        let env = self.vm.attach().with_context(|| "attaching to TabulaVM")?;

        let tabula = env
            .configure_tabula(
                None,
                None,
                tabula::OutputFormat::Json,
                true,
                tabula::ExtractionMethod::Decide,
                false,
                None,
            )
            .with_context(|| "configuring Tabula to extract all tables")?;

        let extracted_file = tempfile::NamedTempFile::new()?;
        tabula
            .parse_document_into(pdf_path, extracted_file.path())
            .with_context(|| format!("extracting tables from {pdf_path:?} with Tabula"))?;
        let result: JsonTableSet = serde_json::from_reader(extracted_file)
            .with_context(|| "parsing JSON output from Tabula")?;

        Ok(tables_from_json(result))
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

fn tables_from_json(table_set: JsonTableSet) -> Vec<RawTable> {
    table_set
        .0
        .into_iter()
        .filter_map(|table| {
            let page = table.page_number;
            let grid = table.data.into_iter().map(JsonRow::into_row).collect();
            let raw = RawTable::from_grid(grid);
            if raw.is_none() {
                log::debug!("Dropping empty Tabula table on page {page}");
            }
            raw
        })
        .collect()
}
