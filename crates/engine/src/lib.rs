//! Business ledger core.
//!
//! A [`Ledger`] keeps a local [`RecordCache`] of one remote collection
//! consistent with a [`DocumentStore`], drives a single-record
//! [`EditSession`], and derives the running total of the active
//! [`Schema`]. Every cache mutation happens strictly after the store
//! confirmed the matching remote call; on failure the cache keeps its last
//! confirmed state and the error is returned unchanged.
use tracing::{debug, warn};

pub use aggregate::{format_currency, parse_numeric, total};
pub use cache::RecordCache;
pub use error::{LedgerError, StoreError};
pub use record::{DocumentId, FieldValue, Fields, Record, fields};
pub use schema::{FieldKind, FieldSpec, RowRenderer, Schema, SchemaRegistry, render_fields};
pub use session::{EditSession, EditToggle, Submission};
pub use store::{Document, DocumentStore, MemoryStore};

mod aggregate;
mod cache;
mod error;
mod record;
pub mod schema;
mod session;
mod store;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Category shown when none is requested.
pub const DEFAULT_CATEGORY: &str = "bills";

/// Orchestrator for one category view.
///
/// Owns the active category, the cache and the edit session. Operations take
/// `&mut self`, so one instance never has two store calls in flight. Dropping
/// a pending future discards the response without touching the cache; the
/// remote mutation may still land.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    registry: SchemaRegistry,
    active: usize,
    cache: RecordCache,
    session: EditSession,
}

impl<S: DocumentStore> Ledger<S> {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder(store: S) -> LedgerBuilder<S> {
        LedgerBuilder {
            store,
            registry: None,
            category: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        self.registry.at(self.active)
    }

    pub fn category(&self) -> &'static str {
        self.schema().key
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &[Record] {
        self.cache.all()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Switches to `key`: the cache is emptied and the session closed before
    /// the new collection is fetched.
    ///
    /// An unknown key changes nothing. A failed fetch leaves the cache empty.
    pub async fn set_category(&mut self, key: &str) -> LedgerResult<()> {
        let active = self
            .registry
            .position(key)
            .ok_or_else(|| LedgerError::UnknownCategory(key.to_string()))?;

        self.active = active;
        self.cache.clear();
        self.session.cancel();
        debug!(category = key, "category switched");

        self.load().await
    }

    /// Fetches the active collection and replaces the cache wholesale.
    pub async fn load(&mut self) -> LedgerResult<()> {
        let collection = self.schema().collection;
        let documents = match self.store.fetch_all(collection).await {
            Ok(documents) => documents,
            Err(err) => {
                warn!(collection, "load failed: {err}");
                return Err(err.into());
            }
        };

        let records: Vec<Record> = documents
            .into_iter()
            .map(|doc| Record {
                id: DocumentId::new(doc.id),
                fields: doc.fields,
            })
            .collect();
        let missing = records.iter().filter(|r| r.id.is_none()).count();
        if missing > 0 {
            warn!(collection, missing, "fetched documents without identifier");
        }
        self.cache.load(records);
        debug!(collection, count = self.cache.len(), "cache loaded");
        self.session.cache_reloaded();
        Ok(())
    }

    /// Opens a blank draft for a new record.
    pub fn begin_create(&mut self) {
        let blank = self.schema().blank_draft();
        self.session.begin_create(blank);
    }

    /// Opens an edit of the record at `index`, or closes it if that row is
    /// already under edit.
    pub fn begin_edit(&mut self, index: usize) -> LedgerResult<EditToggle> {
        let record = self.cache.get(index)?;
        Ok(self.session.begin_edit(index, record))
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    pub fn update_draft_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> LedgerResult<()> {
        self.session.set_field(name, value)
    }

    /// Runs the active schema's form checks on the current draft.
    pub fn validate_draft(&self) -> LedgerResult<()> {
        let draft = self.session.draft().ok_or(LedgerError::NoDraft)?;
        self.schema().validate(draft)
    }

    /// Sends the current draft to the store.
    ///
    /// On success the cache gets the confirmed record, the session returns to
    /// idle and the cache index of the record is returned. On failure the
    /// draft is kept and the cache is untouched.
    pub async fn submit(&mut self) -> LedgerResult<usize> {
        let submission = self.session.submission().ok_or(LedgerError::NoDraft)?;
        let collection = self.schema().collection;

        let index = match submission {
            Submission::Create(fields) => {
                let id = match self.store.create(collection, &fields).await {
                    Ok(id) => id,
                    Err(err) => {
                        warn!(collection, "create failed: {err}");
                        return Err(err.into());
                    }
                };
                debug!(collection, %id, "record created");
                self.cache.append(Record::new(id, fields))
            }
            Submission::Update { index, fields } => {
                let id = self
                    .cache
                    .get(index)?
                    .id
                    .clone()
                    .ok_or(LedgerError::MissingIdentifier(index))?;
                if let Err(err) = self.store.update(collection, &id, &fields).await {
                    warn!(collection, %id, "update failed: {err}");
                    return Err(err.into());
                }
                debug!(collection, %id, "record updated");
                self.cache.replace_at(index, fields)?;
                index
            }
        };

        self.session.cancel();
        Ok(index)
    }

    /// Deletes the record at `index` once the store confirmed it.
    ///
    /// A record without identifier is skipped: nothing is sent and `None` is
    /// returned.
    pub async fn delete(&mut self, index: usize) -> LedgerResult<Option<Record>> {
        let collection = self.schema().collection;
        let Some(id) = self.cache.get(index)?.id.clone() else {
            warn!(collection, index, "{}", LedgerError::MissingIdentifier(index));
            return Ok(None);
        };

        if let Err(err) = self.store.delete(collection, &id).await {
            warn!(collection, %id, "delete failed: {err}");
            return Err(err.into());
        }

        let removed = self.cache.remove_at(index)?;
        self.session.record_removed(index);
        debug!(collection, %id, "record deleted");
        Ok(Some(removed))
    }

    /// Running total over the cache, `None` when the schema has no total.
    pub fn total(&self) -> Option<f64> {
        self.schema()
            .total_field
            .map(|field| total(self.cache.all(), field))
    }

    /// Display cells of every cached record, in cache order.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let schema = self.schema();
        self.cache
            .all()
            .iter()
            .map(|record| schema.render_row(record))
            .collect()
    }
}

pub struct LedgerBuilder<S> {
    store: S,
    registry: Option<SchemaRegistry>,
    category: Option<String>,
}

impl<S: DocumentStore> LedgerBuilder<S> {
    /// Schemas to serve; defaults to [`SchemaRegistry::builtin`].
    pub fn registry(mut self, registry: SchemaRegistry) -> LedgerBuilder<S> {
        self.registry = Some(registry);
        self
    }

    /// Initial category; defaults to [`DEFAULT_CATEGORY`], or the first
    /// registered schema when that key is not registered.
    pub fn category(mut self, key: &str) -> LedgerBuilder<S> {
        self.category = Some(key.to_string());
        self
    }

    /// Construct `Ledger` with an empty cache. Call [`Ledger::load`] to fill
    /// it.
    pub fn build(self) -> LedgerResult<Ledger<S>> {
        let registry = self.registry.unwrap_or_else(SchemaRegistry::builtin);
        let active = match self.category.as_deref() {
            Some(key) => registry
                .position(key)
                .ok_or_else(|| LedgerError::UnknownCategory(key.to_string()))?,
            None => match registry.position(DEFAULT_CATEGORY) {
                Some(index) => index,
                None if !registry.is_empty() => 0,
                None => {
                    return Err(LedgerError::UnknownCategory(
                        DEFAULT_CATEGORY.to_string(),
                    ));
                }
            },
        };

        Ok(Ledger {
            store: self.store,
            registry,
            active,
            cache: RecordCache::default(),
            session: EditSession::Idle,
        })
    }
}
