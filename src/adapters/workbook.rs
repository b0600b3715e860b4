use crate::domain::model::{Harvest, Probe, ProbeOutcome, Table};
use crate::domain::sheet_name::SheetNamer;
use crate::utils::error::{HarvestError, Result};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

pub const RUN_LOG_SHEET: &str = "RunLog";

pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;
pub const MAX_CELL_CHARS: usize = 32_767;

/// Checks that `table`, header row included, fits on one worksheet.
pub fn check_table_fits(table: &Table) -> std::result::Result<(), String> {
    let rows = table.rows.len() + 1;
    if rows > MAX_ROWS {
        return Err(format!("{} rows exceed the worksheet limit of {}", rows, MAX_ROWS));
    }

    let width = table
        .rows
        .iter()
        .map(Vec::len)
        .fold(table.width(), usize::max);
    if width > MAX_COLUMNS {
        return Err(format!(
            "{} columns exceed the worksheet limit of {}",
            width, MAX_COLUMNS
        ));
    }

    let longest = table
        .headers
        .iter()
        .chain(table.rows.iter().flatten())
        .map(|text| text.chars().count())
        .fold(0, usize::max);
    if longest > MAX_CELL_CHARS {
        return Err(format!(
            "a cell of {} characters exceeds the limit of {}",
            longest, MAX_CELL_CHARS
        ));
    }

    Ok(())
}

/// Builds the output workbook in memory.
///
/// The writer is open while sheets are added; [`WorkbookWriter::finish`]
/// consumes it and returns the serialised file.
pub struct WorkbookWriter {
    workbook: Workbook,
    namer: SheetNamer,
    header_format: Format,
    sheet_names: Vec<String>,
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            namer: SheetNamer::new(),
            header_format: Format::new().set_bold(),
            sheet_names: Vec::new(),
        }
    }

    /// Run metadata, then one row per sub-page and one row per probe.
    pub fn write_run_log(&mut self, harvest: &Harvest) -> Result<String> {
        let name = self.namer.claim(RUN_LOG_SHEET);
        let header_format = self.header_format.clone();
        let sheet = self.workbook.add_worksheet();
        sheet.set_name(&name)?;

        let run = &harvest.run;
        write_row(sheet, 0, &["run_timestamp", "year", "race_slug"], Some(&header_format))?;
        sheet.write_string(1, 0, &run.run_timestamp)?;
        sheet.write_number(1, 1, f64::from(run.year))?;
        sheet.write_string(1, 2, run.race_slug.as_str())?;

        let mut row: RowNum = 3;
        write_row(
            sheet,
            row,
            &["page", "url", "status", "tables", "detail"],
            Some(&header_format),
        )?;
        for page in &harvest.pages {
            row += 1;
            let (status, detail) = match &page.tables {
                Ok(_) => ("ok", ""),
                Err(reason) => ("failed", reason.as_str()),
            };
            write_row(sheet, row, &[&page.page, &page.url, status], None)?;
            sheet.write_number(row, 3, page.table_count() as f64)?;
            if !detail.is_empty() {
                sheet.write_string(row, 4, detail)?;
            }
        }

        row += 2;
        write_row(
            sheet,
            row,
            &["candidate", "status", "last_modified", "detail"],
            Some(&header_format),
        )?;
        for probe in &harvest.probes {
            row += 1;
            let (status, last_modified, detail) = describe_probe(probe);
            write_row(sheet, row, &[probe.slug.as_str(), status, &last_modified, &detail], None)?;
        }

        self.sheet_names.push(name.clone());
        Ok(name)
    }

    /// Adds `table` as a new sheet named after `name` and returns the name
    /// actually used.
    pub fn write_table(&mut self, name: &str, table: &Table) -> Result<String> {
        let name = self.namer.claim(name);
        let header_format = self.header_format.clone();
        let sheet = self.workbook.add_worksheet();
        sheet.set_name(&name)?;

        let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
        write_row(sheet, 0, &headers, Some(&header_format))?;

        for (index, cells) in table.rows.iter().enumerate() {
            let row = row_num(index + 1)?;
            for (col, text) in cells.iter().enumerate() {
                let col = col_num(col)?;
                if text.is_empty() {
                    continue;
                }
                match numeric_value(text) {
                    Some(number) => sheet.write_number(row, col, number)?,
                    None => sheet.write_string(row, col, text)?,
                };
            }
        }

        self.sheet_names.push(name.clone());
        Ok(name)
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn finish(mut self) -> Result<Vec<u8>> {
        Ok(self.workbook.save_to_buffer()?)
    }
}

fn write_row(sheet: &mut Worksheet, row: RowNum, cells: &[&str], format: Option<&Format>) -> Result<()> {
    for (col, text) in cells.iter().enumerate() {
        let col = col_num(col)?;
        match format {
            Some(format) => sheet.write_string_with_format(row, col, *text, format)?,
            None => sheet.write_string(row, col, *text)?,
        };
    }
    Ok(())
}

fn describe_probe(probe: &Probe) -> (&'static str, String, String) {
    match &probe.outcome {
        ProbeOutcome::Fresh {
            last_modified: Some(at),
        } => ("ok", at.format("%Y-%m-%d %H:%M:%S").to_string(), String::new()),
        ProbeOutcome::Fresh { last_modified: None } => {
            ("ok", String::new(), "no Last-Modified header".to_string())
        }
        ProbeOutcome::Skipped(reason) => ("skipped", String::new(), reason.to_string()),
    }
}

fn row_num(index: usize) -> Result<RowNum> {
    RowNum::try_from(index).map_err(|_| HarvestError::Processing {
        message: format!("row {} does not fit in a worksheet", index),
    })
}

fn col_num(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).map_err(|_| HarvestError::Processing {
        message: format!("column {} does not fit in a worksheet", index),
    })
}

/// Plain decimal numbers such as `12`, `-3` or `1.5` are stored as numbers.
/// Lap times, gaps like `+1.2` and codes with leading zeros stay text.
fn numeric_value(text: &str) -> Option<f64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return None;
    }
    if int_part.len() > 15 {
        return None;
    }

    text.parse::<f64>().ok()
}
