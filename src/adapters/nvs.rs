//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`]: the device configuration is stored as a
//! single postcard blob under the `homeguard` namespace. Credentials
//! (WiFi password, bot token) therefore never appear as compiled-in
//! literals — a provisioning tool writes the blob over the serial
//! bootloader, and factory-fresh devices fall back to defaults.
//!
//! The ESP-IDF NVS API commits atomically per `nvs_commit()`; the
//! in-memory simulation backend achieves that trivially.

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::DeviceConfig;
use log::info;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const NAMESPACE: &core::ffi::CStr = c"homeguard";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &core::ffi::CStr = c"devcfg";

#[cfg(not(target_os = "espidf"))]
const SIM_KEY: &str = "homeguard/devcfg";

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after an IDF version bump the partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                log::warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NVS: flash initialised");
            Ok(Self {})
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NVS(sim): in-memory store");
            Ok(Self {
                store: RefCell::new(HashMap::new()),
            })
        }
    }
}

impl Default for NvsAdapter {
    /// Adapter with no persistence (used when flash init fails — the node
    /// runs this session on defaults and NVS self-heals on reboot).
    fn default() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        }
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<DeviceConfig, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            let mut handle: nvs_handle_t = 0;
            // SAFETY: single-threaded main-task access; handle closed below.
            let ret =
                unsafe { nvs_open(NAMESPACE.as_ptr(), nvs_open_mode_t_NVS_READONLY, &mut handle) };
            if ret == ESP_ERR_NVS_NOT_FOUND {
                return Err(ConfigError::NotFound);
            }
            if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }

            let mut len: usize = 0;
            let ret = unsafe {
                nvs_get_blob(handle, CONFIG_KEY.as_ptr(), core::ptr::null_mut(), &mut len)
            };
            if ret == ESP_ERR_NVS_NOT_FOUND {
                unsafe { nvs_close(handle) };
                return Err(ConfigError::NotFound);
            }
            if ret != ESP_OK || len == 0 {
                unsafe { nvs_close(handle) };
                return Err(ConfigError::IoError);
            }

            let mut buf = vec![0u8; len];
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    CONFIG_KEY.as_ptr(),
                    buf.as_mut_ptr().cast(),
                    &mut len,
                )
            };
            unsafe { nvs_close(handle) };
            if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }

            postcard::from_bytes(&buf).map_err(|_| ConfigError::Corrupted)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let store = self.store.borrow();
            let bytes = store.get(SIM_KEY).ok_or(ConfigError::NotFound)?;
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)
        }
    }

    fn save(&self, config: &DeviceConfig) -> Result<(), ConfigError> {
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(target_os = "espidf")]
        {
            let mut handle: nvs_handle_t = 0;
            // SAFETY: single-threaded main-task access; handle closed below.
            let ret =
                unsafe { nvs_open(NAMESPACE.as_ptr(), nvs_open_mode_t_NVS_READWRITE, &mut handle) };
            if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            let ret = unsafe {
                nvs_set_blob(handle, CONFIG_KEY.as_ptr(), bytes.as_ptr().cast(), bytes.len())
            };
            if ret == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                unsafe { nvs_close(handle) };
                return Err(ConfigError::StorageFull);
            }
            if ret != ESP_OK {
                unsafe { nvs_close(handle) };
                return Err(ConfigError::IoError);
            }
            let ret = unsafe { nvs_commit(handle) };
            unsafe { nvs_close(handle) };
            if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            Ok(())
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.store.borrow_mut().insert(SIM_KEY.to_string(), bytes);
            Ok(())
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn load_before_save_is_not_found() {
        let nvs = NvsAdapter::new().unwrap();
        assert_eq!(nvs.load().unwrap_err(), ConfigError::NotFound);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let nvs = NvsAdapter::new().unwrap();
        let mut cfg = DeviceConfig::default();
        cfg.wifi_ssid.push_str("HomeNet").unwrap();
        cfg.authorized_chat_id.push_str("987").unwrap();

        nvs.save(&cfg).unwrap();
        let loaded = nvs.load().unwrap();
        assert_eq!(loaded.wifi_ssid, cfg.wifi_ssid);
        assert_eq!(loaded.authorized_chat_id, cfg.authorized_chat_id);
    }

    #[test]
    fn corrupted_blob_is_reported() {
        let nvs = NvsAdapter::new().unwrap();
        nvs.store
            .borrow_mut()
            .insert(SIM_KEY.to_string(), vec![0xFF; 3]);
        assert_eq!(nvs.load().unwrap_err(), ConfigError::Corrupted);
    }
}
