//! Attachment metadata queries. The document bytes live in the blob store.

use rusqlite::{params, Connection, Row};

use super::DbResult;
use crate::models::{Attachment, NewAttachment, RecordRef};
use chrono::Utc;

const COLUMNS: &str = "id, record_type, record_id, description, document_file_name, \
                       document_content_type, document_file_size, document_hash, created_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    let record_type: String = row.get(1)?;
    let record_id: i64 = row.get(2)?;
    let record = RecordRef::parse(&record_type, record_id).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown record type: {record_type}").into(),
        )
    })?;

    Ok(Attachment {
        id: row.get(0)?,
        record,
        description: row.get(3)?,
        document_file_name: row.get(4)?,
        document_content_type: row.get(5)?,
        document_file_size: row.get(6)?,
        document_hash: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Records metadata for a document already written to the blob store under `hash`.
pub fn insert(conn: &Connection, new: &NewAttachment, hash: &str) -> DbResult<Attachment> {
    let now = Utc::now();
    let size = i64::try_from(new.bytes.len()).unwrap_or(i64::MAX);
    conn.execute(
        r#"
        INSERT INTO attachments (
            record_type, record_id, description, document_file_name,
            document_content_type, document_file_size, document_hash, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            new.record.type_name(),
            new.record.id(),
            new.description,
            new.file_name,
            new.content_type,
            size,
            hash,
            now,
        ],
    )?;

    Ok(Attachment {
        id: conn.last_insert_rowid(),
        record: new.record,
        description: new.description.clone(),
        document_file_name: new.file_name.clone(),
        document_content_type: new.content_type.clone(),
        document_file_size: size,
        document_hash: hash.to_string(),
        created_at: now,
    })
}

pub fn list_for_record(conn: &Connection, record: RecordRef) -> DbResult<Vec<Attachment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM attachments WHERE record_type = ?1 AND record_id = ?2 ORDER BY id"
    ))?;
    let attachments = stmt
        .query_map(params![record.type_name(), record.id()], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(attachments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn lists_by_polymorphic_parent() {
        let db = Database::open_in_memory().unwrap();
        let upload = |record| NewAttachment {
            record,
            description: None,
            file_name: "xray.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };

        insert(db.conn(), &upload(RecordRef::Case(1)), "aa").unwrap();
        insert(db.conn(), &upload(RecordRef::Patient(1)), "bb").unwrap();

        let for_case = list_for_record(db.conn(), RecordRef::Case(1)).unwrap();
        assert_eq!(for_case.len(), 1);
        assert_eq!(for_case[0].record, RecordRef::Case(1));
        assert_eq!(for_case[0].document_file_size, 3);
        assert_eq!(for_case[0].document_hash, "aa");
    }
}
