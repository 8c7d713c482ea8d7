use crate::domain::payment::Payment;
use crate::domain::ports::{Change, Record, Repository};
use crate::domain::submission::{Consultation, Contact, Mentorship, SelfEvaluation, User};
use crate::error::{PulseError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding the last id handed out per collection.
pub const CF_SEQUENCES: &str = "sequences";

/// Column Family mapping `collection/lookup key` to a record id.
pub const CF_LOOKUP: &str = "lookup";

/// One Column Family per entity collection.
pub const COLLECTIONS: [&str; 6] = [
    User::COLLECTION,
    SelfEvaluation::COLLECTION,
    Consultation::COLLECTION,
    Mentorship::COLLECTION,
    Contact::COLLECTION,
    Payment::COLLECTION,
];

fn lookup_entry(collection: &str, key: &str) -> Vec<u8> {
    format!("{collection}/{key}").into_bytes()
}

fn decode_id(bytes: &[u8], what: &str) -> Result<u64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        PulseError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("corrupt {what}"),
        )))
    })?;
    Ok(u64::from_be_bytes(raw))
}

/// A persistent store implementation using RocksDB.
///
/// Every record type lives in its own Column Family keyed by its big-endian id,
/// with JSON values. The next id of each collection is kept in [`CF_SEQUENCES`]
/// and lookup keys in [`CF_LOOKUP`], both written in the same batch as the
/// record, so a crash never reuses an id or leaves a stale index entry.
///
/// Writes are serialised by one async mutex. This struct is thread-safe
/// (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    writes: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the sequence and lookup Column Families and one per
    /// collection exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLLECTIONS
            .iter()
            .chain([&CF_SEQUENCES, &CF_LOOKUP])
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            writes: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PulseError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn last_id(&self, collection: &str) -> Result<u64> {
        let cf = self.cf(CF_SEQUENCES)?;
        match self.db.get_cf(cf, collection.as_bytes())? {
            Some(bytes) => decode_id(&bytes, &format!("sequence for {collection}")),
            None => Ok(0),
        }
    }

    fn lookup_id(&self, collection: &str, key: &str) -> Result<Option<u64>> {
        let cf = self.cf(CF_LOOKUP)?;
        match self.db.get_cf(cf, lookup_entry(collection, key))? {
            Some(bytes) => Ok(Some(decode_id(&bytes, &format!("{collection} lookup '{key}'"))?)),
            None => Ok(None),
        }
    }

    fn read<T: Record>(&self, id: u64) -> Result<Option<T>> {
        let cf = self.cf(T::COLLECTION)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Queues `record` and its lookup entry, replacing those of `previous`.
    fn stage<T: Record>(&self, batch: &mut WriteBatch, previous: Option<&T>, record: &T) -> Result<()> {
        let lookup = self.cf(CF_LOOKUP)?;
        if let Some(old) = previous.and_then(|p| p.lookup_key())
            && record.lookup_key() != Some(old)
        {
            batch.delete_cf(lookup, lookup_entry(T::COLLECTION, old));
        }
        if let Some(key) = record.lookup_key() {
            batch.put_cf(lookup, lookup_entry(T::COLLECTION, key), record.id().to_be_bytes());
        }
        batch.put_cf(
            self.cf(T::COLLECTION)?,
            record.id().to_be_bytes(),
            serde_json::to_vec(record)?,
        );
        Ok(())
    }

    fn scan<T: Record>(&self) -> Result<Vec<T>> {
        let cf = self.cf(T::COLLECTION)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl<T: Record> Repository<T> for RocksDBStore {
    async fn create(&self, new: T::New) -> Result<T> {
        let _guard = self.writes.lock().await;

        let id = self.last_id(T::COLLECTION)? + 1;
        let record = T::assemble(id, Utc::now(), new);

        if T::UNIQUE_KEY
            && let Some(key) = record.lookup_key()
            && self.lookup_id(T::COLLECTION, key)?.is_some()
        {
            return Err(PulseError::Conflict(format!("{} '{}'", T::COLLECTION, key)));
        }

        let mut batch = WriteBatch::default();
        self.stage(&mut batch, None, &record)?;
        batch.put_cf(self.cf(CF_SEQUENCES)?, T::COLLECTION.as_bytes(), id.to_be_bytes());
        self.db.write(batch)?;

        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<T>> {
        self.read(id)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<T>> {
        match self.lookup_id(T::COLLECTION, key)? {
            Some(id) => self.read(id),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<T>> {
        // big-endian keys iterate in id order
        self.scan()
    }

    async fn update(&self, record: T) -> Result<Option<T>> {
        let _guard = self.writes.lock().await;

        let Some(previous) = self.read::<T>(record.id())? else {
            return Ok(None);
        };
        let mut batch = WriteBatch::default();
        self.stage(&mut batch, Some(&previous), &record)?;
        self.db.write(batch)?;
        Ok(Some(record))
    }

    async fn update_with(&self, id: u64, change: Change<T>) -> Result<Option<(T, T)>> {
        let _guard = self.writes.lock().await;

        let Some(before) = self.read::<T>(id)? else {
            return Ok(None);
        };
        let mut after = before.clone();
        if !change(&mut after) {
            return Ok(Some((before.clone(), before)));
        }

        let mut batch = WriteBatch::default();
        self.stage(&mut batch, Some(&before), &after)?;
        self.db.write(batch)?;
        Ok(Some((before, after)))
    }
}
