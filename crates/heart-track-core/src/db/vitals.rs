//! Vitals document database operations.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::RemoteVitalsDocument;

impl Database {
    /// Insert a new vitals document.
    pub fn insert_vitals_document(
        &self,
        project_id: &str,
        doc: &RemoteVitalsDocument,
    ) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO vitals_documents (
                doc_id, project_id, heart_rate, blood_pressure,
                cholesterol, glucose, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                doc.id,
                project_id,
                doc.heart_rate,
                doc.blood_pressure,
                doc.cholesterol,
                doc.glucose,
                format_timestamp(&doc.timestamp),
            ],
        )?;
        Ok(())
    }

    /// Most recent document: timestamp descending, limit one.
    pub fn latest_vitals_document(&self, project_id: &str) -> DbResult<Option<RemoteVitalsDocument>> {
        self.conn
            .query_row(
                r#"
                SELECT doc_id, heart_rate, blood_pressure, cholesterol, glucose, timestamp
                FROM vitals_documents
                WHERE project_id = ?
                ORDER BY timestamp DESC, rowid DESC
                LIMIT 1
                "#,
                [project_id],
                DocumentRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List documents newest first.
    pub fn list_vitals_documents(
        &self,
        project_id: &str,
        limit: usize,
    ) -> DbResult<Vec<RemoteVitalsDocument>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT doc_id, heart_rate, blood_pressure, cholesterol, glucose, timestamp
            FROM vitals_documents
            WHERE project_id = ?
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![project_id, limit as i64], DocumentRow::from_row)?;

        let mut docs = Vec::new();
        for row in rows {
            docs.push(row?.try_into()?);
        }
        Ok(docs)
    }

    /// Count documents in a project.
    pub fn count_vitals_documents(&self, project_id: &str) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM vitals_documents WHERE project_id = ?",
            [project_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidTimestamp(format!("{}: {}", s, e)))
}

/// Internal row type for converting from SQLite.
struct DocumentRow {
    doc_id: String,
    heart_rate: f64,
    blood_pressure: String,
    cholesterol: Option<f64>,
    glucose: Option<f64>,
    timestamp: String,
}

impl DocumentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            doc_id: row.get(0)?,
            heart_rate: row.get(1)?,
            blood_pressure: row.get(2)?,
            cholesterol: row.get(3)?,
            glucose: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }
}

impl TryFrom<DocumentRow> for RemoteVitalsDocument {
    type Error = DbError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(RemoteVitalsDocument {
            id: row.doc_id,
            heart_rate: row.heart_rate,
            blood_pressure: row.blood_pressure,
            cholesterol: row.cholesterol,
            glucose: row.glucose,
            timestamp: parse_timestamp(&row.timestamp)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_doc(id: &str, heart_rate: f64, secs: i64) -> RemoteVitalsDocument {
        RemoteVitalsDocument {
            id: id.to_string(),
            heart_rate,
            blood_pressure: "120/80".to_string(),
            cholesterol: Some(190.0),
            glucose: None,
            timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_latest() {
        let db = setup_db();
        assert!(db.latest_vitals_document("proj").unwrap().is_none());

        db.insert_vitals_document("proj", &make_doc("a", 70.0, 0)).unwrap();
        db.insert_vitals_document("proj", &make_doc("b", 75.0, 10)).unwrap();

        let latest = db.latest_vitals_document("proj").unwrap().unwrap();
        assert_eq!(latest.id, "b");
        assert_eq!(latest.heart_rate, 75.0);
        assert_eq!(latest.cholesterol, Some(190.0));
        assert_eq!(latest.glucose, None);
    }

    #[test]
    fn test_latest_orders_by_timestamp_not_insertion() {
        let db = setup_db();

        db.insert_vitals_document("proj", &make_doc("newer", 75.0, 10)).unwrap();
        db.insert_vitals_document("proj", &make_doc("older", 70.0, 0)).unwrap();

        let latest = db.latest_vitals_document("proj").unwrap().unwrap();
        assert_eq!(latest.id, "newer");
    }

    #[test]
    fn test_list_newest_first_and_scoped() {
        let db = setup_db();

        for i in 0..5 {
            db.insert_vitals_document("proj", &make_doc(&format!("d{}", i), 60.0 + i as f64, i))
                .unwrap();
        }
        db.insert_vitals_document("other", &make_doc("x", 99.0, 100)).unwrap();

        let docs = db.list_vitals_documents("proj", 3).unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d4", "d3", "d2"]);

        assert_eq!(db.count_vitals_documents("proj").unwrap(), 5);
        assert_eq!(db.count_vitals_documents("other").unwrap(), 1);
    }

    #[test]
    fn test_documents_are_append_only() {
        let db = setup_db();
        db.insert_vitals_document("proj", &make_doc("a", 70.0, 0)).unwrap();

        let update = db
            .conn()
            .execute("UPDATE vitals_documents SET heart_rate = 1", []);
        assert!(update.is_err());

        let delete = db.conn().execute("DELETE FROM vitals_documents", []);
        assert!(delete.is_err());

        assert_eq!(db.count_vitals_documents("proj").unwrap(), 1);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text, "2023-11-14T22:13:20.123456Z");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
