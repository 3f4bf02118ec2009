//! Persistent xlsx report shared by every audit category.
//!
//! One workbook holds one sheet per category. Opening loads the existing workbook,
//! appending creates a missing sheet (header included) and only ever adds rows after the
//! last populated one, and nothing reaches disk until [`ReportStore::save`].

use crate::error::{AuditError, Result};
use std::path::{Path, PathBuf};
use umya_spreadsheet::helper::coordinate::string_from_column_index;
use umya_spreadsheet::{HorizontalAlignmentValues, Spreadsheet, VerticalAlignmentValues, Worksheet};

pub const DEFAULT_REPORT_PATH: &str = "reports/all_the_reports.xlsx";

const HEADER_FILL: &str = "FFDDDDDD";

/// Name and header row of a report sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub headers: &'static [&'static str],
}

pub const TEST_SHEET: SheetLayout =
    SheetLayout { name: "Test", headers: &["Page URL", "Test Case", "Status", "Comments"] };

pub const CURRENCY_SHEET: SheetLayout =
    SheetLayout { name: "Currency", headers: &["Page URL", "Currency", "Status", "Comments"] };

pub const SCRIPT_DATA_SHEET: SheetLayout = SheetLayout {
    name: "Script Data",
    headers: &["SiteURL", "SiteName", "Browser", "CountryCode", "IP", "CampaignID"],
};

/// The report workbook, held in memory between [`open`](ReportStore::open) and
/// [`save`](ReportStore::save).
///
/// Single writer only: the load-modify-save cycle takes no lock on the file.
pub struct ReportStore {
    path: PathBuf,
    book: Spreadsheet,
}

impl ReportStore {
    /// Load the workbook at `path`, or start an empty one when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let book = if path.exists() {
            log::debug!("Loading existing report {}", path.display());
            umya_spreadsheet::reader::xlsx::read(&path)
                .map_err(|e| AuditError::ReportRead { path: path.clone(), reason: e.to_string() })?
        } else {
            log::debug!("Starting new report {}", path.display());
            umya_spreadsheet::new_file_empty_worksheet()
        };

        Ok(Self { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append rows to a category sheet using its layout
    pub fn append(&mut self, layout: &SheetLayout, rows: &[Vec<String>]) -> Result<usize> {
        self.append_sheet(layout.name, layout.headers, rows)
    }

    /// Append `rows` to sheet `name`, creating it first if needed.
    ///
    /// The header row is written only when row 1 is still blank. Returns the number of
    /// rows appended.
    pub fn append_sheet(&mut self, name: &str, headers: &[&str], rows: &[Vec<String>]) -> Result<usize> {
        if self.book.get_sheet_by_name(name).is_none() {
            log::info!("Creating sheet '{}'", name);
            self.book.new_sheet(name).map_err(|e| AuditError::ReportWrite {
                path: self.path.clone(),
                reason: format!("Failed to create sheet '{}': {}", name, e),
            })?;
        }

        let sheet = self.book.get_sheet_by_name_mut(name).ok_or_else(|| AuditError::ReportWrite {
            path: self.path.clone(),
            reason: format!("Sheet '{}' missing after creation", name),
        })?;

        if !header_present(sheet) {
            write_header(sheet, headers);
        }

        let first_row = sheet.get_highest_row().max(1) + 1;
        for (offset, row) in rows.iter().enumerate() {
            let row_num = first_row + offset as u32;
            for (col, value) in row.iter().enumerate() {
                sheet.get_cell_mut((col as u32 + 1, row_num)).set_value_string(value.as_str());
            }
        }

        log::info!("Appended {} rows to sheet '{}'", rows.len(), name);
        Ok(rows.len())
    }

    /// Size columns to their content and write the workbook to disk
    pub fn save(&mut self) -> Result<()> {
        if self.book.get_sheet_count() == 0 {
            log::debug!("Report {} has no sheets, nothing to save", self.path.display());
            return Ok(());
        }

        for name in self.sheet_names() {
            if let Some(sheet) = self.book.get_sheet_by_name_mut(&name) {
                fit_columns(sheet);
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path)
            .map_err(|e| AuditError::ReportWrite { path: self.path.clone(), reason: e.to_string() })?;

        log::info!("Report saved to {}", self.path.display());
        Ok(())
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.book.get_sheet_collection().iter().map(|sheet| sheet.get_name().to_string()).collect()
    }

    /// Every populated row of a sheet, header included, as rendered strings
    pub fn sheet_values(&self, name: &str) -> Option<Vec<Vec<String>>> {
        let sheet = self.book.get_sheet_by_name(name)?;
        let width = sheet.get_highest_column();

        Some(
            (1..=sheet.get_highest_row())
                .map(|row| (1..=width).map(|col| sheet.get_value((col, row))).collect())
                .collect(),
        )
    }
}

fn header_present(sheet: &Worksheet) -> bool {
    (1..=sheet.get_highest_column()).any(|col| !sheet.get_value((col, 1)).is_empty())
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) {
    for (col, header) in headers.iter().enumerate() {
        let coordinate = (col as u32 + 1, 1u32);
        sheet.get_cell_mut(coordinate).set_value_string(*header);

        let style = sheet.get_style_mut(coordinate);
        style.get_font_mut().set_bold(true);
        style.set_background_color(HEADER_FILL);
        let alignment = style.get_alignment_mut();
        alignment.set_horizontal(HorizontalAlignmentValues::Center);
        alignment.set_vertical(VerticalAlignmentValues::Center);
    }
}

/// Longest rendered value in each column, plus two characters of padding
fn fit_columns(sheet: &mut Worksheet) {
    let widths: Vec<(u32, usize)> = (1..=sheet.get_highest_column())
        .map(|col| {
            let longest = (1..=sheet.get_highest_row())
                .map(|row| sheet.get_value((col, row)).chars().count())
                .max()
                .unwrap_or(0);
            (col, longest)
        })
        .collect();

    for (col, longest) in widths {
        let letter = string_from_column_index(&col);
        sheet.get_column_dimension_mut(&letter).set_width((longest + 2) as f64);
    }
}
