//! The feedback submission flow: validate, persist, then best-effort enrich.
//!
//! The two phases are strictly sequential and deliberately asymmetric: a
//! persistence failure aborts the request, while an enrichment failure is
//! swallowed and reported as a degraded success. An entry is never lost
//! because the advisory text could not be generated.

use std::future::Future;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use verdant_database::Database;
use verdant_database::impls::entries;
use verdant_database::model::entry::{Category, Entry, NewEntry};
use verdant_llm::LlmService;

/// Returned in place of generated text when enrichment fails.
pub const FALLBACK_FEEDBACK: &str =
    "Entry saved! The tailored feedback engine is currently overloaded. Please check back later.";

/// The submission payload as received over the wire. Fields are optional so
/// that presence can be validated with a single uniform error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    pub category: Option<String>,
    pub entry: Option<String>,
    pub user_id: Option<String>,
}

/// Request-facing failures of the submission flow. Enrichment failure is
/// absent on purpose: it downgrades to a successful [`SubmitOutcome`].
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid or missing JSON body")]
    MalformedRequest(#[source] serde_json::Error),
    #[error("Missing category, entry, or user_id")]
    MissingFields,
    #[error("Unknown category `{0}`")]
    UnknownCategory(String),
    #[error("Missing feedback provider configuration")]
    NotConfigured,
    #[error("Failed to save entry")]
    Persistence(#[source] anyhow::Error),
}

/// Result of a submission: the persisted entry plus the feedback text shown
/// to the user. `enriched` is false when the text is the fallback message.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub entry: Entry,
    pub feedback: String,
    pub enriched: bool,
}

/// Durable storage for entries, abstracted so tests can substitute an
/// in-memory fake.
pub trait EntryStore {
    fn insert_entry(&self, new: &NewEntry) -> impl Future<Output = anyhow::Result<Entry>> + Send;
    fn set_entry_feedback(
        &self,
        entry_id: Uuid,
        feedback: &str,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

impl EntryStore for Database {
    async fn insert_entry(&self, new: &NewEntry) -> anyhow::Result<Entry> {
        entries::insert_entry(self, new).await
    }

    async fn set_entry_feedback(&self, entry_id: Uuid, feedback: &str) -> anyhow::Result<bool> {
        entries::set_entry_feedback(self, entry_id, feedback).await
    }
}

/// Produces advisory text for one entry.
pub trait FeedbackGenerator {
    fn generate(
        &self,
        category: Category,
        entry_text: &str,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

impl FeedbackGenerator for LlmService {
    async fn generate(&self, category: Category, entry_text: &str) -> anyhow::Result<String> {
        self.generate_feedback(category, entry_text).await
    }
}

/// Record one entry and best-effort attach generated feedback.
///
/// Order of checks mirrors the endpoint contract: field validation first
/// (no write on failure), then the configuration gate (still no write), then
/// exactly one insert, then at most one provider call and one update.
pub async fn submit_entry<S, G>(
    store: &S,
    generator: Option<&G>,
    request: SubmitRequest,
) -> Result<SubmitOutcome, SubmitError>
where
    S: EntryStore,
    G: FeedbackGenerator,
{
    let new = validate(request)?;

    let Some(generator) = generator else {
        return Err(SubmitError::NotConfigured);
    };

    let entry = match store.insert_entry(&new).await {
        Ok(entry) => entry,
        Err(source) => {
            error!(?source, "failed to save entry");
            return Err(SubmitError::Persistence(source));
        }
    };
    debug!(entry_id = %entry.id, category = %entry.category, "entry persisted");

    match generator.generate(entry.category, &entry.entry_text).await {
        Ok(text) => {
            match store.set_entry_feedback(entry.id, &text).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(entry_id = %entry.id, "feedback update matched no row");
                }
                Err(source) => {
                    // The entry itself is already durable; the user still
                    // gets the generated text.
                    warn!(?source, entry_id = %entry.id, "failed to store generated feedback");
                }
            }

            Ok(SubmitOutcome {
                entry,
                feedback: text,
                enriched: true,
            })
        }
        Err(source) => {
            warn!(?source, entry_id = %entry.id, "feedback generation failed, returning fallback");

            Ok(SubmitOutcome {
                entry,
                feedback: FALLBACK_FEEDBACK.to_owned(),
                enriched: false,
            })
        }
    }
}

fn validate(request: SubmitRequest) -> Result<NewEntry, SubmitError> {
    let category_raw = non_blank(request.category).ok_or(SubmitError::MissingFields)?;
    let entry_text = non_blank(request.entry).ok_or(SubmitError::MissingFields)?;
    let user_id = non_blank(request.user_id).ok_or(SubmitError::MissingFields)?;

    let category = Category::from_str(&category_raw)
        .map_err(|_| SubmitError::UnknownCategory(category_raw))?;

    Ok(NewEntry {
        user_id,
        category,
        entry_text,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
