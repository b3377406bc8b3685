/// All entity primary keys are UUIDs, generated by the database.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts are integer cents. Rates, deposits, and fees are
/// rounded to cents at the API boundary and never stored as floats.
pub type Cents = i64;
