use std::path::Path;

use anyhow::{Context, Result, anyhow};
use engine::table::{RawTable, Row};
use lazy_regex::regex;

use crate::DocumentParser;

/// Parses tables heuristically from the PDF's text layout.
///
/// Cells are separated by runs of two or more whitespace characters.
/// Consecutive lines with the same number of cells (at least two) form a
/// table, whose first line is the header.
#[derive(Debug, Default)]
pub struct TextLayoutParser;

impl TextLayoutParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for TextLayoutParser {
    fn name(&self) -> &'static str {
        "text"
    }

    fn parse(&self, pdf_path: &Path) -> Result<Vec<RawTable>> {
        let bytes =
            std::fs::read(pdf_path).with_context(|| format!("reading PDF file {pdf_path:?}"))?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| anyhow!("extracting text from {pdf_path:?}: {e}"))?;
        log::debug!("Extracted {} characters of text from {pdf_path:?}", text.len());
        Ok(tables_from_text(&text))
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Groups the lines of `text` into tables.
pub fn tables_from_text(text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut run: Vec<Row> = Vec::new();

    for line in text.lines() {
        let cells = split_cells(line);
        let continues_run = run.first().is_some_and(|first| first.len() == cells.len());
        if !continues_run {
            flush_run(&mut run, &mut tables);
        }
        if cells.len() >= 2 {
            run.push(cells);
        }
    }
    flush_run(&mut run, &mut tables);

    tables
}

fn split_cells(line: &str) -> Row {
    let line = line.trim();
    if line.is_empty() {
        return Row::default();
    }
    Row(regex!(r"\s{2,}")
        .split(line)
        .map(str::to_owned)
        .collect())
}

fn flush_run(run: &mut Vec<Row>, tables: &mut Vec<RawTable>) {
    let rows = std::mem::take(run);
    if rows.len() < 2 {
        return;
    }
    if let Some(table) = RawTable::from_grid(rows) {
        tables.push(table);
    }
}
