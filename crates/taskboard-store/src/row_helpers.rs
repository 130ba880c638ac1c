use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::StoreError;

/// Get a column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Parse a string into an enum, returning CorruptRow on failure.
pub fn parse_enum<T: std::str::FromStr>(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    raw.parse().map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("unknown variant: {raw}"),
    })
}

/// Parse an RFC 3339 timestamp column.
pub fn parse_timestamp(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRow {
            table,
            column,
            detail: format!("invalid timestamp {raw}: {e}"),
        })
}

/// Timestamp format written to the database. Fixed width, UTC, so text
/// ordering matches chronological ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::TaskStatus;

    #[test]
    fn parse_enum_success() {
        let result: Result<TaskStatus, _> = parse_enum("completed", "tasks", "status");
        assert_eq!(result.unwrap(), TaskStatus::Completed);
    }

    #[test]
    fn parse_enum_failure() {
        let result: Result<TaskStatus, _> = parse_enum("INVALID", "tasks", "status");
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { table: "tasks", column: "status", .. })
        ));
    }

    #[test]
    fn timestamp_roundtrip() {
        let now = Utc::now();
        let text = format_timestamp(&now);
        assert!(text.ends_with('Z'));
        let parsed = parse_timestamp(&text, "tasks", "created_at").unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn timestamp_text_sorts_chronologically() {
        let earlier = DateTime::parse_from_rfc3339("2024-01-01T09:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }

    #[test]
    fn parse_timestamp_failure() {
        let result = parse_timestamp("yesterday", "tasks", "updated_at");
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { column: "updated_at", .. })
        ));
    }
}
