use std::path::Path;

use anyhow::{Context, Result};
use engine::{cell::Cell, dataset::Dataset};
use hashbrown::HashMap;
use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet};

use super::SheetWriter;

const HEADER_FONT_SIZE: u8 = 12;

/// Writes sheets as XLSX workbooks.
///
/// The header row is bold and centred. Columns are fitted to their content,
/// except those given a width, which wrap their text instead.
#[derive(Debug, Default)]
pub struct XlsxSheetWriter;

impl SheetWriter for XlsxSheetWriter {
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

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .with_context(|| format!("naming sheet {sheet_name:?}"))?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(HEADER_FONT_SIZE)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        let plain_format = Format::new();
        let wrap_format = Format::new().set_text_wrap();

        let mut column_formats = Vec::with_capacity(dataset.labels().len());
        for (index, label) in dataset.labels().iter().enumerate() {
            let col = column_number(index)?;
            worksheet
                .write_string_with_format(0, col, label, &header_format)
                .with_context(|| format!("writing header {label:?}"))?;
            column_formats.push(if widths.contains_key(label) {
                &wrap_format
            } else {
                &plain_format
            });
        }

        for (row_index, row) in dataset.rows().iter().enumerate() {
            let row_num = RowNum::try_from(row_index + 1)
                .with_context(|| format!("row index {row_index} exceeds sheet size"))?;
            for ((index, cell), format) in row.iter().enumerate().zip(&column_formats) {
                write_cell(worksheet, row_num, column_number(index)?, cell, format)
                    .with_context(|| format!("writing row index {row_index}"))?;
            }
        }

        worksheet.autofit();
        for (index, label) in dataset.labels().iter().enumerate() {
            if let Some(&width) = widths.get(label) {
                worksheet
                    .set_column_width(column_number(index)?, width as f64)
                    .with_context(|| format!("setting width of column {label:?}"))?;
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("saving workbook to {path:?}"))?;
        Ok(())
    }
}

fn column_number(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).with_context(|| format!("column index {index} exceeds sheet size"))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
    format: &Format,
) -> Result<()> {
    match cell {
        Cell::Absent => return Ok(()),
        Cell::Integer(value) => worksheet.write_number_with_format(row, col, *value as f64, format),
        Cell::Decimal(value) => worksheet.write_number_with_format(row, col, *value, format),
        Cell::Text(_) | Cell::Unresolved => {
            worksheet.write_string_with_format(row, col, cell.to_string(), format)
        }
    }?;
    Ok(())
}
