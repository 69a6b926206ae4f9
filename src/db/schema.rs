pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    key         TEXT PRIMARY KEY,
    body        TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE documents ADD COLUMN checksum TEXT NOT NULL DEFAULT '';"),
];

/// Key under which the month map is stored.
pub(crate) const BUDGET_DOCUMENT_KEY: &str = "budget_data";

/// Version of the serialized month map inside the document body.
pub(crate) const DOCUMENT_VERSION: u32 = 1;
