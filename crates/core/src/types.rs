/// Opaque record identifier assigned by the tabular backend.
///
/// Distinct from business keys such as the project code; never shown to
/// clients and never parsed.
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
