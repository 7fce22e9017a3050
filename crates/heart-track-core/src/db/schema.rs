//! SQLite schema definition.

/// Complete database schema for the vitals collection.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Vitals Documents (Append-Only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS vitals_documents (
    doc_id TEXT PRIMARY KEY,                     -- store-assigned UUID
    project_id TEXT NOT NULL,
    heart_rate REAL NOT NULL,
    blood_pressure TEXT NOT NULL,                -- free text, e.g. '120/80'
    cholesterol REAL,
    glucose REAL,
    timestamp TEXT NOT NULL                      -- server time, RFC 3339 with fixed microsecond precision
);

CREATE INDEX IF NOT EXISTS idx_vitals_project_timestamp
    ON vitals_documents(project_id, timestamp DESC);

-- Records are immutable once written
CREATE TRIGGER IF NOT EXISTS vitals_documents_no_update BEFORE UPDATE ON vitals_documents BEGIN
    SELECT RAISE(ABORT, 'vitals documents are append-only');
END;

CREATE TRIGGER IF NOT EXISTS vitals_documents_no_delete BEFORE DELETE ON vitals_documents BEGIN
    SELECT RAISE(ABORT, 'vitals documents are append-only');
END;
"#;
