//! The reviewer's working set: which value is active per day and field,
//! plus free edits, and the batches those edits turn into.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::batch::CommitEntry;
use crate::model::comparison::{DatabaseDay, DayComparison, Source, SpreadsheetDay};
use crate::reconcile::time::{format_wire_date, local_to_instant, parse_hhmm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no working row for {0}")]
    UnknownDay(NaiveDate),
    #[error("{0} is both selected for update and marked for deletion")]
    ConflictingIntent(NaiveDate),
}

/// A local `(date, HH:mm)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stamp {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl Stamp {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        local_to_instant(self.date?, self.time.as_deref()?)
    }
}

/// Seconds from `check_in` to `check_out`. `None` when either side is
/// incomplete or the span runs backwards.
pub fn span_seconds(check_in: &Stamp, check_out: &Stamp) -> Option<i64> {
    let seconds = (check_out.instant()? - check_in.instant()?).num_seconds();
    (seconds >= 0).then_some(seconds)
}

fn sheet_stamp(sheet: &SpreadsheetDay, field: Field) -> Stamp {
    match field {
        Field::CheckIn => Stamp {
            date: sheet.check_in_date,
            time: sheet.check_in.clone(),
        },
        Field::CheckOut => Stamp {
            date: sheet.check_out_date,
            time: sheet.check_out.clone(),
        },
    }
}

fn db_stamp(db: &DatabaseDay, field: Field) -> Stamp {
    match field {
        Field::CheckIn => Stamp {
            date: db.check_in_date,
            time: db.check_in.clone(),
        },
        Field::CheckOut => Stamp {
            date: db.check_out_date,
            time: db.check_out.clone(),
        },
    }
}

/// Formats free text while typing: digits only, separator as soon as two
/// hour digits are in.
pub fn format_time_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() >= 2 {
        format!("{}:{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Strict `HH:mm`, hour <= 23, minute <= 59.
pub fn is_valid_time(value: &str) -> bool {
    value.len() == 5 && parse_hhmm(value).is_some()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayEdit {
    pub row_date: NaiveDate,
    pub check_in: Stamp,
    pub check_out: Stamp,
    pub check_in_source: Option<Source>,
    pub check_out_source: Option<Source>,
    pub selected: bool,
    pub marked_for_deletion: bool,
    draft_in: Option<String>,
    draft_out: Option<String>,
    sheet: SpreadsheetDay,
    db: DatabaseDay,
}

impl DayEdit {
    pub fn from_comparison(day: &DayComparison) -> Self {
        let mut edit = DayEdit {
            row_date: day.date,
            check_in: Stamp::default(),
            check_out: Stamp::default(),
            check_in_source: None,
            check_out_source: None,
            selected: false,
            marked_for_deletion: false,
            draft_in: None,
            draft_out: None,
            sheet: day.spreadsheet.clone(),
            db: day.database.clone(),
        };
        edit.select_source(Field::CheckIn, day.selection.check_in);
        edit.select_source(Field::CheckOut, day.selection.check_out);
        edit
    }

    fn stamp_mut(&mut self, field: Field) -> &mut Stamp {
        match field {
            Field::CheckIn => &mut self.check_in,
            Field::CheckOut => &mut self.check_out,
        }
    }

    fn draft_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::CheckIn => &mut self.draft_in,
            Field::CheckOut => &mut self.draft_out,
        }
    }

    /// Copies value and date from `source`; the other field is untouched.
    pub fn select_source(&mut self, field: Field, source: Source) {
        let stamp = match source {
            Source::Spreadsheet => sheet_stamp(&self.sheet, field),
            Source::Database => db_stamp(&self.db, field),
        };
        // a side without a date still anchors to the row
        let stamp = Stamp {
            date: stamp.date.or(Some(self.row_date)),
            time: stamp.time,
        };
        *self.stamp_mut(field) = stamp;
        *self.draft_mut(field) = None;
        match field {
            Field::CheckIn => self.check_in_source = Some(source),
            Field::CheckOut => self.check_out_source = Some(source),
        }
    }

    /// Records typed text; nothing is applied until [`DayEdit::confirm_time`].
    pub fn set_time(&mut self, field: Field, raw: &str) -> String {
        let formatted = format_time_input(raw);
        *self.draft_mut(field) = Some(formatted.clone());
        formatted
    }

    pub fn draft(&self, field: Field) -> Option<&str> {
        match field {
            Field::CheckIn => self.draft_in.as_deref(),
            Field::CheckOut => self.draft_out.as_deref(),
        }
    }

    /// Applies the pending draft. Invalid text reverts to the last committed
    /// value and returns `false`; empty text clears the time.
    pub fn confirm_time(&mut self, field: Field) -> bool {
        let Some(draft) = self.draft_mut(field).take() else {
            return true;
        };

        if draft.is_empty() {
            self.stamp_mut(field).time = None;
        } else if is_valid_time(&draft) {
            self.stamp_mut(field).time = Some(draft);
        } else {
            return false;
        }

        match field {
            Field::CheckIn => self.check_in_source = None,
            Field::CheckOut => self.check_out_source = None,
        }
        true
    }

    pub fn set_date(&mut self, field: Field, date: NaiveDate) {
        self.stamp_mut(field).date = Some(date);
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        span_seconds(&self.check_in, &self.check_out)
    }

    pub fn to_commit_entry(&self) -> CommitEntry {
        let row = self.row_date;
        CommitEntry {
            date: format_wire_date(&row),
            check_in_date: Some(format_wire_date(&self.check_in.date.unwrap_or(row))),
            check_in_time: self.check_in.time.clone(),
            check_out_date: Some(format_wire_date(&self.check_out.date.unwrap_or(row))),
            check_out_time: self.check_out.time.clone(),
        }
    }
}

/// Editable rows for one employee over one window, keyed by row date.
#[derive(Debug, Default)]
pub struct WorkingSet {
    days: BTreeMap<NaiveDate, DayEdit>,
}

/// Writes the working set asks for.
#[derive(Debug, Default, PartialEq)]
pub struct PendingBatches {
    pub updates: Vec<CommitEntry>,
    pub deletions: Vec<String>,
}

impl WorkingSet {
    pub fn from_comparisons(days: &[DayComparison]) -> Self {
        Self {
            days: days
                .iter()
                .map(|d| (d.date, DayEdit::from_comparison(d)))
                .collect(),
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayEdit> {
        self.days.get(&date)
    }

    fn day_mut(&mut self, date: NaiveDate) -> Result<&mut DayEdit, SelectionError> {
        self.days
            .get_mut(&date)
            .ok_or(SelectionError::UnknownDay(date))
    }

    pub fn select_source(
        &mut self,
        date: NaiveDate,
        field: Field,
        source: Source,
    ) -> Result<(), SelectionError> {
        self.day_mut(date)?.select_source(field, source);
        Ok(())
    }

    pub fn set_time(
        &mut self,
        date: NaiveDate,
        field: Field,
        raw: &str,
    ) -> Result<String, SelectionError> {
        Ok(self.day_mut(date)?.set_time(field, raw))
    }

    pub fn confirm_time(&mut self, date: NaiveDate, field: Field) -> Result<bool, SelectionError> {
        Ok(self.day_mut(date)?.confirm_time(field))
    }

    pub fn set_date(
        &mut self,
        date: NaiveDate,
        field: Field,
        value: NaiveDate,
    ) -> Result<(), SelectionError> {
        self.day_mut(date)?.set_date(field, value);
        Ok(())
    }

    pub fn toggle_selected(&mut self, date: NaiveDate) -> Result<bool, SelectionError> {
        let day = self.day_mut(date)?;
        day.selected = !day.selected;
        Ok(day.selected)
    }

    pub fn toggle_deletion(&mut self, date: NaiveDate) -> Result<bool, SelectionError> {
        let day = self.day_mut(date)?;
        day.marked_for_deletion = !day.marked_for_deletion;
        Ok(day.marked_for_deletion)
    }

    pub fn duration_seconds(&self, date: NaiveDate) -> Option<i64> {
        self.days.get(&date)?.duration_seconds()
    }

    /// Splits flagged rows into an update batch and a delete batch. A row
    /// flagged both ways is refused rather than guessed at.
    pub fn pending_batches(&self) -> Result<PendingBatches, SelectionError> {
        let mut batches = PendingBatches::default();
        for day in self.days.values() {
            match (day.selected, day.marked_for_deletion) {
                (true, true) => return Err(SelectionError::ConflictingIntent(day.row_date)),
                (true, false) => batches.updates.push(day.to_commit_entry()),
                (false, true) => batches.deletions.push(format_wire_date(&day.row_date)),
                (false, false) => {}
            }
        }
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::comparison::{Discrepancies, Selection};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn comparison() -> DayComparison {
        DayComparison {
            date: date(1),
            day_name: "Thursday".into(),
            spreadsheet: SpreadsheetDay {
                check_in: Some("23:50".into()),
                check_in_date: Some(date(1)),
                check_out: Some("00:10".into()),
                check_out_date: Some(date(2)),
                ..Default::default()
            },
            database: DatabaseDay {
                check_in: Some("08:00".into()),
                check_in_date: Some(date(1)),
                check_out: Some("17:00".into()),
                check_out_date: Some(date(1)),
                ..Default::default()
            },
            discrepancies: Discrepancies::default(),
            issues: vec![],
            selection: Selection::both(Source::Spreadsheet),
            calculated_duration: None,
        }
    }

    #[test]
    fn seeded_from_default_selection_and_spans_midnight() {
        let set = WorkingSet::from_comparisons(&[comparison()]);
        let day = set.day(date(1)).unwrap();
        assert_eq!(day.check_out.date, Some(date(2)));
        assert_eq!(set.duration_seconds(date(1)), Some(20 * 60));
    }

    #[test]
    fn selecting_check_in_leaves_check_out_alone() {
        let mut set = WorkingSet::from_comparisons(&[comparison()]);
        set.select_source(date(1), Field::CheckIn, Source::Database).unwrap();

        let day = set.day(date(1)).unwrap();
        assert_eq!(day.check_in.time.as_deref(), Some("08:00"));
        assert_eq!(day.check_out.time.as_deref(), Some("00:10"));
        assert_eq!(day.check_out.date, Some(date(2)));
        assert_eq!(day.check_in_source, Some(Source::Database));
        assert_eq!(day.check_out_source, Some(Source::Spreadsheet));
    }

    #[test]
    fn typed_time_gets_separator_and_invalid_input_reverts() {
        let mut set = WorkingSet::from_comparisons(&[comparison()]);

        assert_eq!(set.set_time(date(1), Field::CheckIn, "0915").unwrap(), "09:15");
        assert!(set.confirm_time(date(1), Field::CheckIn).unwrap());
        assert_eq!(set.day(date(1)).unwrap().check_in.time.as_deref(), Some("09:15"));

        set.set_time(date(1), Field::CheckIn, "2561").unwrap();
        assert!(!set.confirm_time(date(1), Field::CheckIn).unwrap());
        assert_eq!(set.day(date(1)).unwrap().check_in.time.as_deref(), Some("09:15"));

        set.set_time(date(1), Field::CheckIn, "9").unwrap();
        assert!(!set.confirm_time(date(1), Field::CheckIn).unwrap());
        assert_eq!(set.day(date(1)).unwrap().draft(Field::CheckIn), None);
    }

    #[test]
    fn separator_follows_the_hour_digits() {
        assert_eq!(format_time_input("0"), "0");
        assert_eq!(format_time_input("09"), "09:");
        assert_eq!(format_time_input("09:"), "09:");
        assert_eq!(format_time_input("09:3"), "09:3");
        assert_eq!(format_time_input("0930"), "09:30");
        assert_eq!(format_time_input("09:301"), "09:30");
        assert_eq!(format_time_input("ab"), "");

        let mut set = WorkingSet::from_comparisons(&[comparison()]);
        assert_eq!(set.set_time(date(1), Field::CheckIn, "09").unwrap(), "09:");
        assert!(!set.confirm_time(date(1), Field::CheckIn).unwrap());
    }

    #[test]
    fn backwards_span_has_no_duration() {
        let mut set = WorkingSet::from_comparisons(&[comparison()]);
        set.set_date(date(1), Field::CheckOut, date(1)).unwrap();
        assert_eq!(set.duration_seconds(date(1)), None);

        set.set_date(date(1), Field::CheckOut, date(3)).unwrap();
        assert_eq!(set.duration_seconds(date(1)), Some(24 * 3600 + 20 * 60));
    }

    #[test]
    fn batches_refuse_conflicting_flags() {
        let mut set = WorkingSet::from_comparisons(&[comparison()]);
        set.toggle_selected(date(1)).unwrap();

        let batches = set.pending_batches().unwrap();
        assert_eq!(batches.updates.len(), 1);
        assert_eq!(batches.updates[0].check_out_date.as_deref(), Some("02/01/2026"));
        assert!(batches.deletions.is_empty());

        set.toggle_deletion(date(1)).unwrap();
        assert_eq!(
            set.pending_batches(),
            Err(SelectionError::ConflictingIntent(date(1)))
        );

        set.toggle_selected(date(1)).unwrap();
        assert_eq!(set.pending_batches().unwrap().deletions, vec!["01/01/2026"]);
    }

    #[test]
    fn unknown_day_is_reported() {
        let mut set = WorkingSet::from_comparisons(&[comparison()]);
        assert_eq!(
            set.toggle_selected(date(9)),
            Err(SelectionError::UnknownDay(date(9)))
        );
    }
}
