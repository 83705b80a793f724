//! Mapping configuration port.
//!
//! The engine never stores mapping templates. For every event it asks the
//! provider which records apply; custom-versus-default precedence and device
//! matching are entirely the provider's business.
//!
//! A key may drive several records at once: `R` can be a single key on its
//! own and the trigger of `Shift+R`. The provider returns every candidate in
//! precedence order and the engine picks one from the keys currently held.

use touchmap_core::{DeviceType, KeyCode, KeyToTouchMappingInfo, MappingType};

/// Resolves the mapping record for an incoming event.
#[cfg_attr(test, mockall::automock)]
pub trait MappingProvider: Send + Sync {
    /// Every mapping bound to `key_code` on `device_type`, highest
    /// precedence first. Empty when the key is unmapped.
    fn mappings_for_key(&self, device_type: DeviceType, key_code: KeyCode) -> Vec<KeyToTouchMappingInfo>;

    /// Mapping for a button-driven mode (mouse fire, right click), if any.
    fn mapping_for_mode(&self, device_type: DeviceType, mode: MappingType) -> Option<KeyToTouchMappingInfo>;
}
