//! SQLite reminder repository.

use rapport_core::repository::reminder::{ReminderFilter, ReminderRepository};
use rapport_types::contact::ContactId;
use rapport_types::error::RepositoryError;
use rapport_types::reminder::{Reminder, ReminderId};
use sqlx::{QueryBuilder, Row, Sqlite};

use super::contact::{format_datetime, parse_datetime};
use super::interaction::{format_date, parse_date};
use super::pool::DatabasePool;

#[derive(Clone)]
pub struct SqliteReminderRepository {
    pool: DatabasePool,
}

impl SqliteReminderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ReminderRow {
    id: String,
    contact_id: String,
    title: String,
    description: String,
    date: String,
    is_completed: bool,
    created_at: String,
}

impl ReminderRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            contact_id: row.try_get("contact_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            is_completed: row.try_get("is_completed")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_reminder(self) -> Result<Reminder, RepositoryError> {
        Ok(Reminder {
            id: self
                .id
                .parse::<ReminderId>()
                .map_err(|e| RepositoryError::Query(format!("invalid reminder id: {e}")))?,
            contact_id: self
                .contact_id
                .parse::<ContactId>()
                .map_err(|e| RepositoryError::Query(format!("invalid contact id: {e}")))?,
            title: self.title,
            description: self.description,
            date: parse_date(&self.date)?,
            is_completed: self.is_completed,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Reminder>, RepositoryError> {
    rows.iter()
        .map(|row| {
            ReminderRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_reminder()
        })
        .collect()
}

impl ReminderRepository for SqliteReminderRepository {
    async fn create(&self, reminder: &Reminder) -> Result<Reminder, RepositoryError> {
        sqlx::query(
            "INSERT INTO reminders (id, contact_id, title, description, date, is_completed, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(reminder.id.to_string())
        .bind(reminder.contact_id.to_string())
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(format_date(&reminder.date))
        .bind(reminder.is_completed)
        .bind(format_datetime(&reminder.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(reminder.clone())
    }

    async fn get_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM reminders WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            ReminderRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_reminder()
        })
        .transpose()
    }

    async fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> Result<Vec<Reminder>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM reminders WHERE contact_id = ? ORDER BY date ASC, created_at ASC",
        )
        .bind(contact_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_rows(&rows)
    }

    async fn list(&self, filter: Option<ReminderFilter>) -> Result<Vec<Reminder>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM reminders");

        if filter.pending_only {
            query.push(" WHERE is_completed = 0");
        }
        query.push(" ORDER BY date ASC, created_at ASC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_rows(&rows)
    }

    async fn update(&self, reminder: &Reminder) -> Result<Reminder, RepositoryError> {
        let result = sqlx::query(
            "UPDATE reminders SET title = ?, description = ?, date = ?, is_completed = ? WHERE id = ?",
        )
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(format_date(&reminder.date))
        .bind(reminder.is_completed)
        .bind(reminder.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(reminder.clone())
    }

    async fn delete(&self, id: &ReminderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = ?")
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
    use chrono::{NaiveDate, Utc};

    fn make_reminder(contact_id: ContactId, title: &str, date: (i32, u32, u32)) -> Reminder {
        Reminder {
            id: ReminderId::new(),
            contact_id,
            title: title.to_string(),
            description: title.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_pending_by_date_with_limit() {
        let repo = SqliteReminderRepository::new(test_pool().await);
        let contact_id = ContactId::new();

        let mut done = make_reminder(contact_id, "done", (2024, 1, 1));
        done.is_completed = true;
        repo.create(&done).await.unwrap();
        repo.create(&make_reminder(contact_id, "december", (2024, 12, 1)))
            .await
            .unwrap();
        repo.create(&make_reminder(ContactId::new(), "march", (2024, 3, 1)))
            .await
            .unwrap();
        repo.create(&make_reminder(contact_id, "june", (2024, 6, 1)))
            .await
            .unwrap();

        let pending = repo
            .list(Some(ReminderFilter {
                pending_only: true,
                limit: Some(2),
            }))
            .await
            .unwrap();
        let titles: Vec<&str> = pending.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["march", "june"]);

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].title, "done");

        let for_contact = repo.list_for_contact(&contact_id).await.unwrap();
        let titles: Vec<&str> = for_contact.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["done", "june", "december"]);
    }

    #[tokio::test]
    async fn test_update_marks_completed() {
        let repo = SqliteReminderRepository::new(test_pool().await);
        let mut reminder = make_reminder(ContactId::new(), "call back", (2024, 5, 5));
        repo.create(&reminder).await.unwrap();

        reminder.is_completed = true;
        repo.update(&reminder).await.unwrap();

        let fetched = repo.get_by_id(&reminder.id).await.unwrap().unwrap();
        assert!(fetched.is_completed);
        assert_eq!(fetched.date, reminder.date);
    }

    #[tokio::test]
    async fn test_missing_reminder_is_not_found() {
        let repo = SqliteReminderRepository::new(test_pool().await);
        let reminder = make_reminder(ContactId::new(), "ghost", (2024, 5, 5));
        assert!(matches!(
            repo.update(&reminder).await.unwrap_err(),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            repo.delete(&reminder.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
