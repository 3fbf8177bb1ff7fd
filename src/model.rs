//! Data structures describing the logical content of an operations report.
//!
//! The types in this module form a serialization-friendly model that holds
//! everything the layout engine needs to produce a document.  They
//! intentionally avoid referencing the rendering backend so values can be
//! built up by a frontend, inspected in tests, or exchanged freely without
//! pulling in heavy dependencies.
//!
//! Every mutation is expressed as a value-returning operation: callers
//! replace their copy with the returned [`ReportData`] instead of mutating
//! in place, so no other holder of the previous value ever observes a
//! change.

use log::debug;
use uuid::Uuid;

/// Facilities the report frontend offers for selection.
pub const SITES: &[&str] = &[
    "Site A - Manufacturing Plant",
    "Site B - Power Station",
    "Site C - Chemical Facility",
    "Site D - Refinery Complex",
];

/// Equipment the report frontend offers for selection.
pub const MACHINES: &[&str] = &[
    "Compressor - Atlas Copco",
    "Turbine - Siemens",
    "Pump - Grundfos",
    "Generator - Caterpillar",
];

/// Available report formats; the chosen string becomes the document title.
pub const REPORT_TYPES: &[&str] = &[
    "Daily Operations Report",
    "Weekly Summary Report",
    "Maintenance Report",
    "Incident Report",
];

/// One worker/task row in the labor section of a report.
///
/// Entries are owned exclusively by their parent [`ReportData`].  The `id`
/// exists only so edits and removals can target a specific row; it is never
/// displayed and never derived from the other fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaborEntry {
    id: String,
    name: String,
    role: String,
    hours: f64,
    task: String,
}

impl LaborEntry {
    /// Creates an empty entry with a freshly generated unique id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// Returns the identifier used for edit/remove targeting.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the worker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the worker role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the hours worked by this entry.
    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Returns the task description.
    pub fn task(&self) -> &str {
        &self.task
    }
}

/// Addressable fields of a [`LaborEntry`] for targeted updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaborField {
    /// The worker name column.
    Name,
    /// The worker role column.
    Role,
    /// The hours column; values are parsed and normalized, never rejected.
    Hours,
    /// The task description column.
    Task,
}

/// Parses user input for the hours field.
///
/// Non-numeric input yields 0 rather than an error, and negative values are
/// clamped to 0 since the field is defined as non-negative.
fn parse_hours(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(hours) if hours >= 0.0 && hours.is_finite() => hours,
        _ => {
            debug!("normalizing hours input {value:?} to 0");
            0.0
        }
    }
}

/// The canonical structured representation of one report.
///
/// A value starts out with empty defaults (except `date`, which defaults to
/// today), is filled in across the frontend steps, and is finally consumed
/// read-only by the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportData {
    site: String,
    machine: String,
    report_type: String,
    date: String,
    engineer_name: String,
    labor_details: Vec<LaborEntry>,
    hours_worked: f64,
    remarks: String,
    project_code: Option<String>,
    location: Option<String>,
}

impl ReportData {
    /// Creates a report draft with empty defaults and today's date.
    pub fn new() -> Self {
        Self {
            site: String::new(),
            machine: String::new(),
            report_type: String::new(),
            date: chrono::Local::now().date_naive().to_string(),
            engineer_name: String::new(),
            labor_details: Vec::new(),
            hours_worked: 0.0,
            remarks: String::new(),
            project_code: None,
            location: None,
        }
    }

    /// Returns the selected facility.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Returns the selected equipment.
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// Returns the selected report type.
    pub fn report_type(&self) -> &str {
        &self.report_type
    }

    /// Returns the report date as an ISO calendar date string.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the reporting engineer's name.
    pub fn engineer_name(&self) -> &str {
        &self.engineer_name
    }

    /// Returns the labor entries in insertion order.
    pub fn labor_details(&self) -> &[LaborEntry] {
        &self.labor_details
    }

    /// Returns the reported total hours.
    ///
    /// This is independent of the per-entry hour sum; no consistency rule
    /// ties the two together.
    pub fn hours_worked(&self) -> f64 {
        self.hours_worked
    }

    /// Returns the free-text remarks, possibly containing line breaks.
    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    /// Returns the optional project code.
    pub fn project_code(&self) -> Option<&str> {
        self.project_code.as_deref()
    }

    /// Returns the optional location note.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Shallow-merges the provided fields over this value.
    ///
    /// Fields left unset in the patch are carried over unchanged.  There is
    /// no deep merge of `labor_details`; patching that field replaces the
    /// whole sequence.
    pub fn update(&self, patch: ReportPatch) -> Self {
        let mut next = self.clone();
        if let Some(site) = patch.site {
            next.site = site;
        }
        if let Some(machine) = patch.machine {
            next.machine = machine;
        }
        if let Some(report_type) = patch.report_type {
            next.report_type = report_type;
        }
        if let Some(date) = patch.date {
            next.date = date;
        }
        if let Some(engineer_name) = patch.engineer_name {
            next.engineer_name = engineer_name;
        }
        if let Some(labor_details) = patch.labor_details {
            next.labor_details = labor_details;
        }
        if let Some(hours_worked) = patch.hours_worked {
            next.hours_worked = hours_worked;
        }
        if let Some(remarks) = patch.remarks {
            next.remarks = remarks;
        }
        if let Some(project_code) = patch.project_code {
            next.project_code = Some(project_code);
        }
        if let Some(location) = patch.location {
            next.location = Some(location);
        }
        next
    }

    /// Appends a fresh empty labor entry and returns the updated report.
    ///
    /// There is no upper bound on the number of entries.
    pub fn add_labor_entry(&self) -> Self {
        let mut next = self.clone();
        next.labor_details.push(LaborEntry::new());
        next
    }

    /// Removes the entry with the given id and returns the updated report.
    ///
    /// An unknown id is a no-op, not an error.  The relative order of the
    /// remaining entries is preserved.
    pub fn remove_labor_entry(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.labor_details.retain(|entry| entry.id != id);
        next
    }

    /// Replaces one field of the entry with the given id and returns the
    /// updated report.
    ///
    /// An unknown id is a no-op.  [`LaborField::Hours`] values are parsed
    /// from the string, with non-numeric or negative input normalized to 0.
    pub fn update_labor_entry(&self, id: &str, field: LaborField, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(entry) = next.labor_details.iter_mut().find(|entry| entry.id == id) {
            match field {
                LaborField::Name => entry.name = value.to_owned(),
                LaborField::Role => entry.role = value.to_owned(),
                LaborField::Hours => entry.hours = parse_hours(value),
                LaborField::Task => entry.task = value.to_owned(),
            }
        }
        next
    }
}

impl Default for ReportData {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial [`ReportData`] used with [`ReportData::update`].
///
/// Every field is optional; unset fields leave the target untouched.  The
/// two optional report fields can be set but not cleared through a patch,
/// matching the frontend which only ever writes them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportPatch {
    /// Replacement facility selection.
    pub site: Option<String>,
    /// Replacement equipment selection.
    pub machine: Option<String>,
    /// Replacement report type.
    pub report_type: Option<String>,
    /// Replacement report date.
    pub date: Option<String>,
    /// Replacement engineer name.
    pub engineer_name: Option<String>,
    /// Replacement labor entry sequence.
    pub labor_details: Option<Vec<LaborEntry>>,
    /// Replacement total hours.
    pub hours_worked: Option<f64>,
    /// Replacement remarks text.
    pub remarks: Option<String>,
    /// Replacement project code.
    pub project_code: Option<String>,
    /// Replacement location note.
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{parse_hours, LaborField, ReportData, ReportPatch};

    fn report_with_entries(count: usize) -> ReportData {
        let mut report = ReportData::new();
        for _ in 0..count {
            report = report.add_labor_entry();
        }
        report
    }

    #[test]
    fn added_entries_have_unique_ids() {
        let report = report_with_entries(50);
        let mut ids: Vec<&str> = report.labor_details().iter().map(|e| e.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn removal_preserves_order_and_ignores_unknown_ids() {
        let report = report_with_entries(4);
        let ids: Vec<String> = report
            .labor_details()
            .iter()
            .map(|e| e.id().to_owned())
            .collect();

        let report = report.remove_labor_entry(&ids[1]);
        let remaining: Vec<&str> = report.labor_details().iter().map(|e| e.id()).collect();
        assert_eq!(remaining, vec![&ids[0], &ids[2], &ids[3]]);

        let unchanged = report.remove_labor_entry("no-such-id");
        assert_eq!(unchanged, report);
    }

    #[test]
    fn entry_update_targets_one_field_of_one_entry() {
        let report = report_with_entries(2);
        let first = report.labor_details()[0].id().to_owned();

        let report = report.update_labor_entry(&first, LaborField::Name, "R. Okafor");
        let report = report.update_labor_entry(&first, LaborField::Hours, "7.5");

        assert_eq!(report.labor_details()[0].name(), "R. Okafor");
        assert_eq!(report.labor_details()[0].hours(), 7.5);
        assert_eq!(report.labor_details()[1].name(), "");
        assert_eq!(report.labor_details()[1].hours(), 0.0);
    }

    #[test]
    fn entry_update_with_unknown_id_is_a_no_op() {
        let report = report_with_entries(1);
        let same = report.update_labor_entry("missing", LaborField::Task, "inspection");
        assert_eq!(same, report);
    }

    #[test]
    fn bad_hours_input_normalizes_to_zero() {
        assert_eq!(parse_hours("eight"), 0.0);
        assert_eq!(parse_hours("-3"), 0.0);
        assert_eq!(parse_hours("NaN"), 0.0);
        assert_eq!(parse_hours(" 12.25 "), 12.25);
    }

    #[test]
    fn update_is_a_shallow_merge_that_leaves_the_input_alone() {
        let original = report_with_entries(1).update(ReportPatch {
            site: Some("Site B - Power Station".to_owned()),
            ..ReportPatch::default()
        });
        let snapshot = original.clone();

        let patched = original.update(ReportPatch {
            engineer_name: Some("M. Laine".to_owned()),
            hours_worked: Some(9.0),
            ..ReportPatch::default()
        });

        assert_eq!(original, snapshot);
        assert_eq!(patched.site(), "Site B - Power Station");
        assert_eq!(patched.engineer_name(), "M. Laine");
        assert_eq!(patched.hours_worked(), 9.0);
        assert_eq!(patched.labor_details(), original.labor_details());
    }

    #[test]
    fn optional_fields_are_skipped_until_set() {
        let report = ReportData::new();
        assert_eq!(report.project_code(), None);
        assert_eq!(report.location(), None);

        let report = report.update(ReportPatch {
            project_code: Some("PRJ-2024-001".to_owned()),
            ..ReportPatch::default()
        });
        assert_eq!(report.project_code(), Some("PRJ-2024-001"));
        assert_eq!(report.location(), None);
    }

    #[test]
    fn new_draft_has_an_iso_date() {
        let report = ReportData::new();
        let date = report.date();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
