//! SQLite contact repository.
//!
//! Detail fields are stored as one JSON object column. Enrichment writes go
//! through `json_patch`, so a partial update touches only the keys it names.

use chrono::{DateTime, Utc};
use rapport_core::repository::contact::{ContactFilter, ContactRepository};
use rapport_types::contact::{Contact, ContactFields, ContactId};
use rapport_types::error::RepositoryError;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;

#[derive(Clone)]
pub struct SqliteContactRepository {
    pool: DatabasePool,
}

impl SqliteContactRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ContactRow {
    id: String,
    user_id: Option<String>,
    name: String,
    starred: bool,
    fields: String,
    created_at: String,
    updated_at: String,
}

impl ContactRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            starred: row.try_get("starred")?,
            fields: row.try_get("fields")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_contact(self) -> Result<Contact, RepositoryError> {
        let id = self
            .id
            .parse::<ContactId>()
            .map_err(|e| RepositoryError::Query(format!("invalid contact id: {e}")))?;

        let fields: ContactFields = serde_json::from_str(&self.fields)
            .map_err(|e| RepositoryError::Query(format!("invalid fields JSON: {e}")))?;

        Ok(Contact {
            id,
            user_id: self.user_id,
            name: self.name,
            starred: self.starred,
            fields,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn fields_json(fields: &ContactFields) -> Result<String, RepositoryError> {
    serde_json::to_string(fields).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl ContactRepository for SqliteContactRepository {
    async fn create(&self, contact: &Contact) -> Result<Contact, RepositoryError> {
        sqlx::query(
            "INSERT INTO contacts (id, user_id, name, starred, fields, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(contact.id.to_string())
        .bind(&contact.user_id)
        .bind(&contact.name)
        .bind(contact.starred)
        .bind(fields_json(&contact.fields)?)
        .bind(format_datetime(&contact.created_at))
        .bind(format_datetime(&contact.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(contact.clone())
    }

    async fn get_by_id(&self, id: &ContactId) -> Result<Option<Contact>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM contacts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let contact_row =
                    ContactRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(contact_row.into_contact()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: Option<ContactFilter>) -> Result<Vec<Contact>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM contacts WHERE 1 = 1");

        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if filter.starred_only {
            query.push(" AND starred = 1");
        }

        query.push(" ORDER BY starred DESC, name COLLATE NOCASE ASC");

        // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
        if filter.limit.is_some() || filter.offset.is_some() {
            query.push(" LIMIT ").push_bind(filter.limit.unwrap_or(-1));
        }
        if let Some(offset) = filter.offset {
            query.push(" OFFSET ").push_bind(offset);
        }

        let rows = query
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut contacts = Vec::with_capacity(rows.len());
        for row in &rows {
            let contact_row =
                ContactRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            contacts.push(contact_row.into_contact()?);
        }

        Ok(contacts)
    }

    async fn update(&self, contact: &Contact) -> Result<Contact, RepositoryError> {
        let result = sqlx::query(
            "UPDATE contacts SET user_id = ?, name = ?, starred = ?, fields = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&contact.user_id)
        .bind(&contact.name)
        .bind(contact.starred)
        .bind(fields_json(&contact.fields)?)
        .bind(format_datetime(&contact.updated_at))
        .bind(contact.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(contact.clone())
    }

    async fn update_fields(
        &self,
        id: &ContactId,
        fields: &ContactFields,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE contacts SET fields = json_patch(fields, ?), updated_at = ? WHERE id = ?",
        )
        .bind(fields_json(fields)?)
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &ContactId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
