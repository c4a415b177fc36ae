//! Per-epic XLSX report assembly
//!
//! One sheet per epic carrying the filter label, a fixed bold header row, and
//! one data row per story appended under its epic's sheet. Columns 3 and 4
//! (Pass/Fail, Comments) stay blank for the tester filling the report in.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::api::{Api, ApiError};
use crate::config::SHEET_FILTER_LABEL;
use crate::model::{EntityId, Epic, Story};

/// Header row written to every sheet
const REPORT_HEADINGS: [&str; 5] = [
    "ID",
    "Process",
    "Test Description",
    "Pass/Fail",
    "Comments - Include URL when reporting an on-screen issue",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("story {story_id} references epic {epic_id}, which has no sheet in this report")]
    MissingEpic {
        story_id: EntityId,
        epic_id: EntityId,
    },

    #[error("could not save '{path}': the file is locked by another process")]
    Locked { path: PathBuf },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("workbook error")]
    Xlsx(#[from] XlsxError),
}

/// Insertion-ordered map from epic id to sheet name
///
/// Mirrors how the report is laid out: sheets appear in the order epics were
/// listed, and a duplicate id overwrites the earlier name in place (last
/// write wins). Lookups are linear scans; the epic count is tiny.
#[derive(Debug, Default)]
pub struct EpicSheets {
    entries: Vec<(EntityId, String)>,
}

impl EpicSheets {
    fn insert(&mut self, id: EntityId, name: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| *eid == id) {
            entry.1 = name;
        } else {
            self.entries.push((id, name));
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(eid, _)| eid == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &str)> {
        self.entries.iter().map(|(id, name)| (id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Epics that carry at least one label named `label`, keyed by id
pub fn epics_with_label(epics: &[Epic], label: &str) -> EpicSheets {
    let mut matching = EpicSheets::default();
    for epic in epics {
        if epic.labels.iter().any(|l| l.name == label) {
            matching.insert(epic.id.clone(), epic.name.clone());
        }
    }
    matching
}

/// Counts reported back to the caller after a successful save
#[derive(Debug)]
pub struct ReportSummary {
    pub sheets: usize,
    pub rows: usize,
}

/// Write `stories` into a workbook at `output`, one sheet per epic labeled
/// [`SHEET_FILTER_LABEL`].
///
/// Epic names become sheet titles verbatim; the workbook itself rejects names
/// that are too long, contain forbidden characters, or collide.
pub fn write_report(
    api: &dyn Api,
    stories: &[Story],
    output: &Path,
) -> Result<ReportSummary, ReportError> {
    let all_epics = api.list_epics()?;
    let sheets = epics_with_label(&all_epics, SHEET_FILTER_LABEL);
    debug!(
        epics = all_epics.len(),
        matching = sheets.len(),
        label = SHEET_FILTER_LABEL,
        "filtered epics"
    );

    let mut workbook = Workbook::new();

    let header_format = Format::new().set_bold();
    let wrap_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);
    let default_format = Format::new().set_align(FormatAlign::Top);

    // Next data row per sheet, keyed by epic id. Row 0 is the header.
    let mut next_row: HashMap<EntityId, u32> = HashMap::new();

    for (epic_id, epic_name) in sheets.iter() {
        next_row.insert(epic_id.clone(), 0);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(epic_name)?;
        worksheet.set_column_width(1, 20)?;
        worksheet.set_column_width(2, 70)?;
        worksheet.set_column_width(3, 40)?;
        for (column, heading) in REPORT_HEADINGS.iter().enumerate() {
            worksheet.write_with_format(0, column as u16, *heading, &header_format)?;
        }
    }

    let mut rows = 0usize;
    for story in stories {
        let sheet_name = sheets
            .get(&story.epic_id)
            .ok_or_else(|| ReportError::MissingEpic {
                story_id: story.id.clone(),
                epic_id: story.epic_id.clone(),
            })?
            .to_string();
        let worksheet = workbook.worksheet_from_name(&sheet_name)?;

        let row = next_row.entry(story.epic_id.clone()).or_insert(0);
        *row += 1;

        match &story.id {
            EntityId::Int(n) => worksheet.write_with_format(*row, 0, *n, &default_format)?,
            EntityId::Text(s) => worksheet.write_with_format(*row, 0, s.as_str(), &default_format)?,
        };
        worksheet.write_with_format(*row, 1, story.name.as_str(), &default_format)?;
        // Normalize line endings; the cell keeps internal breaks as wrapped text.
        let description = story.description.lines().collect::<Vec<_>>().join("\n");
        worksheet.write_with_format(*row, 2, description.as_str(), &wrap_format)?;
        rows += 1;
    }

    match workbook.save(output) {
        Ok(()) => {}
        Err(XlsxError::IoError(e)) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(ReportError::Locked {
                path: output.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    info!(sheets = sheets.len(), rows, path = %output.display(), "report saved");
    Ok(ReportSummary {
        sheets: sheets.len(),
        rows,
    })
}
