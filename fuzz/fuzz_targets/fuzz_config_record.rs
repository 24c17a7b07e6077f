//! Fuzz target: `ConfigRecord::decode`
//!
//! Feeds arbitrary flash images to the record decoder and to
//! `PersistentConfig::load`, verifying:
//! - No panics under arbitrary byte inputs
//! - Every accepted record re-encodes to its first eight bytes
//! - A rejected record loads as the defaults
//!
//! cargo fuzz run fuzz_config_record

#![no_main]

use libfuzzer_sys::fuzz_target;
use relaynode::app::ports::{StorageError, StoragePort};
use relaynode::config::{ConfigRecord, PersistedConfig, RECORD_LEN};
use relaynode::persist::PersistentConfig;

struct Image<'a>(&'a [u8]);

impl StoragePort for Image<'_> {
    fn load(&self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let len = self.0.len().min(buf.len());
        buf[..len].copy_from_slice(&self.0[..len]);
        Ok(len)
    }

    fn save(&mut self, _data: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::IoError)
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        Err(StorageError::CommitFailed)
    }
}

fuzz_target!(|data: &[u8]| {
    let loaded = PersistentConfig::load(&Image(data)).config();

    match ConfigRecord::decode(data) {
        Ok(cfg) => {
            assert_eq!(ConfigRecord::encode(&cfg), data[..RECORD_LEN]);
            assert_eq!(loaded, cfg);
        }
        Err(_) => assert_eq!(loaded, PersistedConfig::default()),
    }
});
