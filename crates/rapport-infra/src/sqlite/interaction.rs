//! SQLite interaction repository.

use chrono::NaiveDate;
use rapport_core::repository::interaction::InteractionRepository;
use rapport_types::contact::ContactId;
use rapport_types::error::RepositoryError;
use rapport_types::interaction::{Interaction, InteractionId};
use sqlx::Row;

use super::contact::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct SqliteInteractionRepository {
    pool: DatabasePool,
}

impl SqliteInteractionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct InteractionRow {
    id: String,
    contact_id: String,
    date: String,
    kind: String,
    notes: String,
    created_at: String,
}

impl InteractionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            contact_id: row.try_get("contact_id")?,
            date: row.try_get("date")?,
            kind: row.try_get("kind")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_interaction(self) -> Result<Interaction, RepositoryError> {
        Ok(Interaction {
            id: self
                .id
                .parse::<InteractionId>()
                .map_err(|e| RepositoryError::Query(format!("invalid interaction id: {e}")))?,
            contact_id: self
                .contact_id
                .parse::<ContactId>()
                .map_err(|e| RepositoryError::Query(format!("invalid contact id: {e}")))?,
            date: parse_date(&self.date)?,
            kind: self.kind,
            notes: self.notes,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| RepositoryError::Query(format!("invalid date '{s}': {e}")))
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Interaction>, RepositoryError> {
    rows.iter()
        .map(|row| {
            InteractionRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_interaction()
        })
        .collect()
}

impl InteractionRepository for SqliteInteractionRepository {
    async fn create(&self, interaction: &Interaction) -> Result<Interaction, RepositoryError> {
        sqlx::query(
            "INSERT INTO interactions (id, contact_id, date, kind, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(interaction.id.to_string())
        .bind(interaction.contact_id.to_string())
        .bind(format_date(&interaction.date))
        .bind(&interaction.kind)
        .bind(&interaction.notes)
        .bind(format_datetime(&interaction.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(interaction.clone())
    }

    async fn get_by_id(&self, id: &InteractionId) -> Result<Option<Interaction>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM interactions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            InteractionRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_interaction()
        })
        .transpose()
    }

    async fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM interactions WHERE contact_id = ? ORDER BY date DESC, created_at DESC",
        )
        .bind(contact_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_rows(&rows)
    }

    async fn update(&self, interaction: &Interaction) -> Result<Interaction, RepositoryError> {
        let result = sqlx::query("UPDATE interactions SET date = ?, kind = ?, notes = ? WHERE id = ?")
            .bind(format_date(&interaction.date))
            .bind(&interaction.kind)
            .bind(&interaction.notes)
            .bind(interaction.id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(interaction.clone())
    }

    async fn delete(&self, id: &InteractionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM interactions WHERE id = ?")
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;
    use chrono::Utc;

    fn make_interaction(contact_id: ContactId, date: &str, notes: &str) -> Interaction {
        Interaction {
            id: InteractionId::new(),
            contact_id,
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            kind: "call".to_string(),
            notes: notes.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_for_contact_newest_first() {
        let repo = SqliteInteractionRepository::new(test_pool().await);
        let contact_id = ContactId::new();
        repo.create(&make_interaction(contact_id, "2024-01-05", "january"))
            .await
            .unwrap();
        repo.create(&make_interaction(contact_id, "2024-11-12", "november"))
            .await
            .unwrap();
        repo.create(&make_interaction(ContactId::new(), "2024-06-01", "someone else"))
            .await
            .unwrap();

        let listed = repo.list_for_contact(&contact_id).await.unwrap();
        let notes: Vec<&str> = listed.iter().map(|i| i.notes.as_str()).collect();
        assert_eq!(notes, vec!["november", "january"]);
    }

    #[tokio::test]
    async fn test_update_round_trips_date() {
        let repo = SqliteInteractionRepository::new(test_pool().await);
        let mut interaction = make_interaction(ContactId::new(), "2024-01-05", "coffee");
        repo.create(&interaction).await.unwrap();

        interaction.date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        interaction.notes = "coffee and cake".to_string();
        repo.update(&interaction).await.unwrap();

        let fetched = repo.get_by_id(&interaction.id).await.unwrap().unwrap();
        assert_eq!(fetched.date, interaction.date);
        assert_eq!(fetched.notes, "coffee and cake");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SqliteInteractionRepository::new(test_pool().await);
        let interaction = make_interaction(ContactId::new(), "2024-01-05", "coffee");
        repo.create(&interaction).await.unwrap();

        repo.delete(&interaction.id).await.unwrap();
        assert!(repo.get_by_id(&interaction.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&interaction.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
