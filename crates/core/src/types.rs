use chrono::SubsecRound;

/// All primary keys are UUID v4, generated by storage.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current time truncated to microseconds, the precision of `timestamptz`.
pub fn now() -> Timestamp {
    truncate(chrono::Utc::now())
}

/// Drop sub-microsecond precision so values survive a database round-trip.
pub fn truncate(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(6)
}
