//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`] for the persisted config record.
//!
//! - **`target_os = "espidf"`**: one NVS blob (`relaynode::cfg`).
//!   `save` maps to `nvs_set_blob`, `commit` to `nvs_commit`; the handle
//!   stays open for the life of the adapter.
//! - **`not(target_os = "espidf")`**: an in-memory flash image with a
//!   separate staging buffer, so uncommitted writes are lost exactly as
//!   they would be on power loss.

use crate::app::ports::{StorageError, StoragePort};
use log::info;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
const NAMESPACE: &[u8] = b"relaynode\0";
#[cfg(target_os = "espidf")]
const KEY: &[u8] = b"cfg\0";

pub struct NvsStore {
    #[cfg(target_os = "espidf")]
    handle: nvs_handle_t,
    #[cfg(not(target_os = "espidf"))]
    committed: Option<Vec<u8>>,
    #[cfg(not(target_os = "espidf"))]
    staged: Option<Vec<u8>>,
}

impl NvsStore {
    /// Initialise NVS flash and open the config namespace.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase / nvs_open are called
            // from the single main-task context before the control loop runs.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t
            {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as esp_err_t
                    || unsafe { nvs_flash_init() } != ESP_OK as esp_err_t
                {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK as esp_err_t {
                return Err(StorageError::IoError);
            }

            let mut handle: nvs_handle_t = 0;
            let ret = unsafe {
                nvs_open(
                    NAMESPACE.as_ptr() as *const _,
                    nvs_open_mode_t_NVS_READWRITE,
                    &mut handle,
                )
            };
            if ret != ESP_OK as esp_err_t {
                warn!("NVS: open failed ({})", ret);
                return Err(StorageError::IoError);
            }
            info!("NvsStore: ESP-IDF NVS initialised");
            Ok(Self { handle })
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NvsStore: simulation backend");
            Ok(Self {
                committed: None,
                staged: None,
            })
        }
    }

    /// Simulation store whose flash already holds `image`.
    #[cfg(not(target_os = "espidf"))]
    pub fn with_image(image: &[u8]) -> Self {
        Self {
            committed: Some(image.to_vec()),
            staged: None,
        }
    }

    /// Simulation: the bytes that would survive a power cycle.
    #[cfg(not(target_os = "espidf"))]
    pub fn committed(&self) -> Option<&[u8]> {
        self.committed.as_deref()
    }
}

impl StoragePort for NvsStore {
    fn load(&self, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            let mut size = buf.len();
            let ret = unsafe {
                nvs_get_blob(
                    self.handle,
                    KEY.as_ptr() as *const _,
                    buf.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret == ESP_ERR_NVS_NOT_FOUND as esp_err_t {
                return Err(StorageError::NotFound);
            }
            if ret != ESP_OK as esp_err_t {
                warn!("NVS: read error {}", ret);
                return Err(StorageError::IoError);
            }
            Ok(size)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let data = self.committed.as_ref().ok_or(StorageError::NotFound)?;
            let len = data.len().min(buf.len());
            buf[..len].copy_from_slice(&data[..len]);
            Ok(len)
        }
    }

    fn save(&mut self, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(target_os = "espidf")]
        {
            let ret = unsafe {
                nvs_set_blob(
                    self.handle,
                    KEY.as_ptr() as *const _,
                    data.as_ptr() as *const _,
                    data.len(),
                )
            };
            if ret != ESP_OK as esp_err_t {
                warn!("NVS: write error {}", ret);
                return Err(StorageError::IoError);
            }
            Ok(())
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.staged = Some(data.to_vec());
            Ok(())
        }
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        #[cfg(target_os = "espidf")]
        {
            let ret = unsafe { nvs_commit(self.handle) };
            if ret != ESP_OK as esp_err_t {
                warn!("NVS: commit error {}", ret);
                return Err(StorageError::CommitFailed);
            }
            Ok(())
        }

        #[cfg(not(target_os = "espidf"))]
        {
            if let Some(staged) = self.staged.take() {
                self.committed = Some(staged);
            }
            Ok(())
        }
    }
}

#[cfg(target_os = "espidf")]
impl Drop for NvsStore {
    fn drop(&mut self) {
        unsafe { nvs_close(self.handle) };
    }
}
