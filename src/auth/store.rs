//! The pending-OTP slot.
//!
//! A single slot, explicitly owned and passed into the flow rather than
//! ambient process state. Only the latest record is ever active: `put`
//! overwrites, verification consumes, expiry purges. Keyed-per-email storage
//! would slot in behind the same trait if concurrent sessions ever mattered
//! in this single-user context.

use std::sync::Arc;
use tracing::warn;

use crate::auth::otp::OtpRecord;
use crate::storage::{ScratchStorage, StorageError};

const OTP_SLOT_KEY: &str = "cimo.otp";

pub trait OtpStore: Send + Sync {
    /// Store `record`, replacing any pending one.
    ///
    /// # Errors
    /// Returns `StorageError` when the backing storage fails.
    fn put(&self, record: &OtpRecord) -> Result<(), StorageError>;

    /// The pending record, if one exists.
    ///
    /// # Errors
    /// Returns `StorageError` when the backing storage fails.
    fn load(&self) -> Result<Option<OtpRecord>, StorageError>;

    /// Drop the pending record. Clearing an empty slot is not an error.
    ///
    /// # Errors
    /// Returns `StorageError` when the backing storage fails.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Slot persisted through a [`ScratchStorage`] as one serialized record,
/// mirroring the original application's single local-storage entry.
pub struct ScratchOtpStore {
    storage: Arc<dyn ScratchStorage>,
}

impl ScratchOtpStore {
    #[must_use]
    pub fn new(storage: Arc<dyn ScratchStorage>) -> Self {
        Self { storage }
    }
}

impl OtpStore for ScratchOtpStore {
    fn put(&self, record: &OtpRecord) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(record)?;
        self.storage.set(OTP_SLOT_KEY, &serialized)
    }

    fn load(&self) -> Result<Option<OtpRecord>, StorageError> {
        let Some(raw) = self.storage.get(OTP_SLOT_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                // A corrupt slot is indistinguishable from no pending code;
                // purge it so the user can start a clean resend.
                warn!("discarding unreadable OTP slot: {err}");
                self.storage.remove(OTP_SLOT_KEY)?;
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(OTP_SLOT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn record(code: &str) -> OtpRecord {
        OtpRecord {
            code: code.to_string(),
            email: "a@x.com".to_string(),
            expires_at: 300_000,
        }
    }

    #[test]
    fn put_load_clear_round_trip() {
        let store = ScratchOtpStore::new(Arc::new(MemoryStorage::new()));
        assert_eq!(store.load().unwrap(), None);

        store.put(&record("123456")).unwrap();
        assert_eq!(store.load().unwrap(), Some(record("123456")));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn put_overwrites_pending_record() {
        let store = ScratchOtpStore::new(Arc::new(MemoryStorage::new()));
        store.put(&record("111111")).unwrap();
        store.put(&record("222222")).unwrap();
        assert_eq!(store.load().unwrap(), Some(record("222222")));
    }

    #[test]
    fn corrupt_slot_is_purged() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("cimo.otp", "{ not a record").unwrap();

        let store = ScratchOtpStore::new(storage.clone());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(storage.get("cimo.otp").unwrap(), None);
    }
}
