use std::str::FromStr;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::Database;
use crate::model::entry::{Category, Domain, Entry, NewEntry, UsageCounts};

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    user_id: String,
    category: String,
    entry_text: String,
    feedback: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for Entry {
    type Error = anyhow::Error;

    fn try_from(row: EntryRow) -> anyhow::Result<Self> {
        let category = Category::from_str(&row.category)
            .with_context(|| format!("entry {} has an unrecognized category", row.id))?;

        Ok(Entry {
            id: row.id,
            user_id: row.user_id,
            category,
            entry_text: row.entry_text,
            feedback: row.feedback,
            created_at: row.created_at,
        })
    }
}

/// Insert a new entry with `feedback` left null, returning the stored row.
pub async fn insert_entry(db: &Database, new: &NewEntry) -> anyhow::Result<Entry> {
    let row: EntryRow = sqlx::query_as(
        "INSERT INTO entries (user_id, category, entry_text, feedback)
         VALUES ($1, $2, $3, NULL)
         RETURNING id, user_id, category, entry_text, feedback, created_at",
    )
    .bind(&new.user_id)
    .bind(new.category.as_str())
    .bind(&new.entry_text)
    .fetch_one(db.pool())
    .await?;

    row.try_into()
}

/// Attach generated feedback to an entry. The guard on `feedback IS NULL`
/// keeps the transition one-shot; returns false when no row was updated.
pub async fn set_entry_feedback(
    db: &Database,
    entry_id: Uuid,
    feedback: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE entries SET feedback = $2 WHERE id = $1 AND feedback IS NULL")
        .bind(entry_id)
        .bind(feedback)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List a user's entries newest first, optionally restricted to the
/// categories of one domain.
pub async fn list_entries_for_user(
    db: &Database,
    user_id: &str,
    domain: Option<Domain>,
) -> anyhow::Result<Vec<Entry>> {
    let rows: Vec<EntryRow> = match domain {
        Some(domain) => {
            let categories: Vec<String> = domain
                .categories()
                .iter()
                .map(|category| category.as_str().to_owned())
                .collect();

            sqlx::query_as(
                "SELECT id, user_id, category, entry_text, feedback, created_at
                 FROM entries
                 WHERE user_id = $1 AND category = ANY($2)
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(user_id)
            .bind(&categories)
            .fetch_all(db.pool())
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id, user_id, category, entry_text, feedback, created_at
                 FROM entries
                 WHERE user_id = $1
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(user_id)
            .fetch_all(db.pool())
            .await?
        }
    };

    rows.into_iter().map(Entry::try_from).collect()
}

/// Aggregate entry counts per domain for one user.
pub async fn count_entries_by_domain(db: &Database, user_id: &str) -> anyhow::Result<UsageCounts> {
    #[derive(sqlx::FromRow)]
    struct CategoryCount {
        category: String,
        count: i64,
    }

    let rows: Vec<CategoryCount> = sqlx::query_as(
        "SELECT category, COUNT(*) AS count
         FROM entries
         WHERE user_id = $1
         GROUP BY category",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    let mut counts = UsageCounts::default();
    for row in rows {
        // Rows with a category this build no longer knows are still counted
        // in the total.
        counts.total += row.count;
        match Category::from_str(&row.category).map(Category::domain) {
            Ok(Domain::Energy) => counts.energy += row.count,
            Ok(Domain::Water) => counts.water += row.count,
            Ok(Domain::Waste) => counts.waste += row.count,
            Err(_) => {}
        }
    }

    Ok(counts)
}
