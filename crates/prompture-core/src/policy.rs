use crate::week::{LABEL_DATE_FORMAT, LABEL_SEPARATOR};
use chrono::NaiveDate;

/// Start date of a bucket label: the component before `" to "`.
pub fn bucket_start(label: &str) -> Option<NaiveDate> {
    let (start, _) = label.split_once(LABEL_SEPARATOR)?;
    NaiveDate::parse_from_str(start.trim(), LABEL_DATE_FORMAT).ok()
}

/// Whole calendar days from the bucket's start to `reference`.
pub fn days_elapsed(label: &str, reference: NaiveDate) -> Option<i64> {
    bucket_start(label).map(|start| (reference - start).num_days())
}

/// True iff more than `retention_days` whole days separate the bucket's
/// start from `reference`. Labels that do not parse are never eligible.
pub fn should_archive(label: &str, reference: NaiveDate, retention_days: u32) -> bool {
    match days_elapsed(label, reference) {
        Some(elapsed) => elapsed > i64::from(retention_days),
        None => {
            tracing::debug!(%label, "not a week bucket, skipping");
            false
        }
    }
}
