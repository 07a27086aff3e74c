use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used in bucket labels and summary file names.
pub const LABEL_DATE_FORMAT: &str = "%m-%d-%Y";

/// Separator between the two dates of a bucket label.
pub const LABEL_SEPARATOR: &str = " to ";

/// Week convention used for every bucket this tool creates or archives.
pub const CANONICAL_WEEK_START: WeekStart = WeekStart::Monday;

// ---------------------------------------------------------------------------
// WeekStart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    /// Days between the start of the week and `date`.
    fn offset(self, date: NaiveDate) -> i64 {
        let wd = date.weekday();
        let n = match self {
            WeekStart::Sunday => wd.num_days_from_sunday(),
            WeekStart::Monday => wd.num_days_from_monday(),
        };
        i64::from(n)
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        })
    }
}

// ---------------------------------------------------------------------------
// WeekBucket
// ---------------------------------------------------------------------------

/// A seven-day span used to group summaries, labelled `"<start> to <end>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekBucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekBucket {
    /// The bucket whose week contains `date`.
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Self {
        let start = date - Duration::days(week_start.offset(date));
        WeekBucket {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{}{LABEL_SEPARATOR}{}",
            self.start.format(LABEL_DATE_FORMAT),
            self.end.format(LABEL_DATE_FORMAT)
        )
    }

    /// Parse a directory name back into a bucket. Returns `None` for names
    /// that are not well-formed seven-day labels.
    pub fn parse(label: &str) -> Option<Self> {
        let (start, end) = label.split_once(LABEL_SEPARATOR)?;
        let start = NaiveDate::parse_from_str(start.trim(), LABEL_DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(end.trim(), LABEL_DATE_FORMAT).ok()?;
        if end - start != Duration::days(6) {
            return None;
        }
        Some(WeekBucket { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for WeekBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub fn bucket_label(date: NaiveDate, week_start: WeekStart) -> String {
    WeekBucket::containing(date, week_start).label()
}

/// File name of the summary for `date`.
pub fn summary_file_name(date: NaiveDate) -> String {
    format!("{}.md", date.format(LABEL_DATE_FORMAT))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
