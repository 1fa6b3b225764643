use std::{fmt::Display, io::Cursor};

use indexmap::IndexMap;
use umya_spreadsheet::Spreadsheet;

use crate::{aggregate::AggregateResult, error::StatisticsError};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const EXPORT_FILE_NAME: &str = "exported-stats.xlsx";

/// Worksheet names, in workbook order.
pub const SHEET_NAMES: [&str; 4] =
    ["Total Revenue", "Orders", "Cups", "Unique Users"];

/// Renders `stats` as an xlsx workbook. Each sheet has a title in its first
/// row followed by one `(bucket, value)` row per bucket, values as text.
pub fn export_workbook(
    stats: &AggregateResult,
) -> Result<Vec<u8>, StatisticsError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();

    write_sheet(&mut book, SHEET_NAMES[0], &stats.revenue)?;
    write_sheet(&mut book, SHEET_NAMES[1], &stats.orders)?;
    write_sheet(&mut book, SHEET_NAMES[2], &stats.cups)?;
    write_sheet(&mut book, SHEET_NAMES[3], &stats.unique_users)?;

    let mut out = Cursor::new(Vec::<u8>::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out)
        .map_err(|e| StatisticsError::Export(e.to_string()))?;

    Ok(out.into_inner())
}

fn write_sheet<V: Display>(
    book: &mut Spreadsheet, name: &str, values: &IndexMap<String, V>,
) -> Result<(), StatisticsError> {
    let sheet = book
        .new_sheet(name)
        .map_err(|e| StatisticsError::Export(format!("{name}: {e}")))?;

    // umya coordinates are 1-based (column, row).
    sheet
        .get_cell_mut((1u32, 1u32))
        .set_value_string(format!("{name} (From start of each time interval)"));

    for (row, (bucket, value)) in (2u32..).zip(values) {
        sheet.get_cell_mut((1u32, row)).set_value_string(bucket.as_str());
        sheet
            .get_cell_mut((2u32, row))
            .set_value_string(value.to_string());
    }

    Ok(())
}
