//! Storage for the settings record.
//!
//! The record lives under the fixed key [`SETTINGS_ID`], so there is never more than one of it.
use std::ops::Deref;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, to_document};
use mongodb::options::{FindOneAndUpdateOptions, ReplaceOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::{CompanyInfo, Notifications, Settings, SETTINGS_ID};

/// Interface of a settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the settings record, if it has been created.
    ///
    /// # Errors
    /// Returns an error if the store can't be read.
    async fn find(&self) -> Result<Option<Settings>>;
    /// Insert `defaults` unless a record already exists, and return whichever record is stored.
    ///
    /// # Errors
    /// Returns an error if the store can't be written.
    async fn create(&self, defaults: &Settings) -> Result<Settings>;
    /// Persist `settings`, creating the record if it doesn't exist yet.
    ///
    /// # Errors
    /// Returns an error if the store can't be written.
    async fn save(&self, settings: &Settings) -> Result<()>;
}

#[async_trait]
impl<T: Deref<Target = dyn SettingsStore> + Send + Sync> SettingsStore for T {
    async fn find(&self) -> Result<Option<Settings>> {
        self.deref().find().await
    }

    async fn create(&self, defaults: &Settings) -> Result<Settings> {
        self.deref().create(defaults).await
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        self.deref().save(settings).await
    }
}

/// On-disk shape of the record. `updatedAt` is a BSON datetime rather than a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument {
    #[serde(rename = "_id")]
    id: String,
    company_info: CompanyInfo,
    notifications: Notifications,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<&Settings> for SettingsDocument {
    fn from(settings: &Settings) -> Self {
        Self {
            id: SETTINGS_ID.to_owned(),
            company_info: settings.company_info.clone(),
            notifications: settings.notifications.clone(),
            updated_at: settings.updated_at,
        }
    }
}

impl From<SettingsDocument> for Settings {
    fn from(document: SettingsDocument) -> Self {
        Self {
            company_info: document.company_info,
            notifications: document.notifications,
            updated_at: document.updated_at,
        }
    }
}

/// A settings store backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoStore {
    col: Collection<SettingsDocument>,
}

impl MongoStore {
    /// Connect to a MongoDB server and use `db`.`collection`.
    ///
    /// # Errors
    /// Returns an error if the connection string is invalid.
    pub async fn connect(uri: &str, db: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        debug!(db, collection, "Using settings collection");
        Ok(Self {
            col: client.database(db).collection(collection),
        })
    }

    /// Number of documents in the collection. Anything other than 0 or 1 means stray records.
    ///
    /// # Errors
    /// Returns an error if the collection can't be counted.
    pub async fn count(&self) -> Result<u64> {
        self.col.count_documents(None, None).await.map_err(Into::into)
    }
}

#[async_trait]
impl SettingsStore for MongoStore {
    async fn find(&self) -> Result<Option<Settings>> {
        Ok(self
            .col
            .find_one(doc! { "_id": SETTINGS_ID }, None)
            .await?
            .map(Into::into))
    }

    async fn create(&self, defaults: &Settings) -> Result<Settings> {
        let mut document = to_document(&SettingsDocument::from(defaults))?;
        // `_id` comes from the filter on insert and can't be part of the update.
        document.remove("_id");

        self.col
            .find_one_and_update(
                doc! { "_id": SETTINGS_ID },
                doc! { "$setOnInsert": document },
                FindOneAndUpdateOptions::builder()
                    .upsert(true)
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await?
            .map(Into::into)
            .ok_or(StoreError::Vanished)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        self.col
            .replace_one(
                doc! { "_id": SETTINGS_ID },
                SettingsDocument::from(settings),
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await?;
        Ok(())
    }
}

/// In-memory store.
pub mod memory {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use parking_lot::RwLock;

    use crate::error::{Result, StoreError};
    use crate::models::Settings;
    use crate::store::SettingsStore;

    /// A settings store holding the record in memory.
    ///
    /// Reads and writes can be switched to fail, which stands in for a lost database connection.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        record: RwLock<Option<Settings>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl MemoryStore {
        /// Store pre-populated with `settings`.
        #[must_use]
        pub fn with_record(settings: Settings) -> Self {
            Self {
                record: RwLock::new(Some(settings)),
                ..Self::default()
            }
        }

        /// Make subsequent reads fail (or succeed again).
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::Release);
        }

        /// Make subsequent writes fail (or succeed again).
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::Release);
        }

        /// Current record, bypassing failure simulation.
        #[must_use]
        pub fn snapshot(&self) -> Option<Settings> {
            self.record.read().clone()
        }

        fn check(flag: &AtomicBool, op: &str) -> Result<()> {
            if flag.load(Ordering::Acquire) {
                Err(StoreError::Unavailable(format!("{} refused", op)))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SettingsStore for MemoryStore {
        async fn find(&self) -> Result<Option<Settings>> {
            Self::check(&self.fail_reads, "read")?;
            Ok(self.record.read().clone())
        }

        async fn create(&self, defaults: &Settings) -> Result<Settings> {
            Self::check(&self.fail_writes, "write")?;
            Ok(self
                .record
                .write()
                .get_or_insert_with(|| defaults.clone())
                .clone())
        }

        async fn save(&self, settings: &Settings) -> Result<()> {
            Self::check(&self.fail_writes, "write")?;
            *self.record.write() = Some(settings.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use crate::error::StoreError;
    use crate::models::{CompanyInfo, Settings};
    use crate::store::memory::MemoryStore;
    use crate::store::{MongoStore, SettingsStore};

    #[tokio::test]
    async fn memory() {
        must_create_once(&MemoryStore::default()).await;
        must_save(&MemoryStore::default()).await;

        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::default());
        must_create_once(&store).await;
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB server on localhost"]
    async fn mongo() {
        let store = MongoStore::connect("mongodb://localhost:27017", "test", "settings")
            .await
            .unwrap();
        store.col.drop(None).await.unwrap();

        must_create_once(&store).await;
        assert_eq!(store.count().await.unwrap(), 1);

        store.col.drop(None).await.unwrap();
        must_save(&store).await;
        assert_eq!(store.count().await.unwrap(), 1);
    }

    async fn must_create_once(store: &impl SettingsStore) {
        assert!(store.find().await.unwrap().is_none(), "store should start empty");

        let first = Settings::default();
        let created = store.create(&first).await.unwrap();
        assert_eq!(created, first);

        let second = Settings::new(first.updated_at + Duration::seconds(10));
        let created = store.create(&second).await.unwrap();
        assert_eq!(created, first, "create should keep the existing record");

        assert_eq!(store.find().await.unwrap(), Some(first));
    }

    async fn must_save(store: &impl SettingsStore) {
        let mut settings = Settings::default();
        store.save(&settings).await.unwrap();
        assert_eq!(store.find().await.unwrap().as_ref(), Some(&settings));

        settings.company_info = CompanyInfo {
            name: Some("Acme".to_owned()),
            license: None,
            address: None,
        };
        settings.touch(Utc::now());
        store.save(&settings).await.unwrap();
        assert_eq!(store.find().await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn must_fail_on_demand() {
        let original = Settings::default();
        let store = MemoryStore::with_record(original.clone());

        store.fail_writes(true);
        let mut changed = original.clone();
        changed.touch(Utc::now());
        assert!(matches!(
            store.save(&changed).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.create(&changed).await.is_err());
        assert_eq!(store.find().await.unwrap(), Some(original.clone()));

        store.fail_reads(true);
        assert!(store.find().await.is_err());
        assert_eq!(store.snapshot(), Some(original));
    }
}
