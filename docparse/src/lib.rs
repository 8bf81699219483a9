//! Backends turning PDF documents into raw candidate tables.

pub mod cachingparser;
pub mod tabulaparser;
pub mod textparser;

use std::path::Path;

use anyhow::Result;
use engine::table::RawTable;

pub trait DocumentParser {
    /// Stable key identifying the backend.
    fn name(&self) -> &'static str;

    /// Reads every table found in the PDF at `pdf_path`, in document order.
    fn parse(&self, pdf_path: &Path) -> Result<Vec<RawTable>>;

    /// Releases resources held by the parser, flushing any pending state.
    fn close(self: Box<Self>) -> Result<()>;
}

impl DocumentParser for Box<dyn DocumentParser> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn parse(&self, pdf_path: &Path) -> Result<Vec<RawTable>> {
        self.as_ref().parse(pdf_path)
    }

    fn close(self: Box<Self>) -> Result<()> {
        (*self).close()
    }
}
