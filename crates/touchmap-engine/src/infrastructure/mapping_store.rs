//! In-memory mapping provider.
//!
//! Mappings are kept per device class in two layers. The custom layer is
//! searched first, so a user's own binding for a key comes before the shipped
//! default for the same key. Within a layer records keep insertion order.

use std::collections::HashMap;

use touchmap_core::{DeviceType, KeyCode, KeyToTouchMappingInfo, MappingType};

use crate::application::provider::MappingProvider;

/// Which layer a mapping belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingLayer {
    Custom,
    Default,
}

#[derive(Debug, Default, Clone)]
struct DeviceTable {
    custom: Vec<KeyToTouchMappingInfo>,
    default: Vec<KeyToTouchMappingInfo>,
}

impl DeviceTable {
    fn layers(&self) -> impl Iterator<Item = &KeyToTouchMappingInfo> {
        self.custom.iter().chain(self.default.iter())
    }
}

#[derive(Debug, Default, Clone)]
pub struct StaticMappingProvider {
    tables: HashMap<DeviceType, DeviceTable>,
}

impl StaticMappingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, device_type: DeviceType, layer: MappingLayer, mapping: KeyToTouchMappingInfo) {
        let table = self.tables.entry(device_type).or_default();
        match layer {
            MappingLayer::Custom => table.custom.push(mapping),
            MappingLayer::Default => table.default.push(mapping),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, device_type: DeviceType, layer: MappingLayer, mapping: KeyToTouchMappingInfo) -> Self {
        self.insert(device_type, layer, mapping);
        self
    }

    /// Total number of records across every device and layer.
    pub fn len(&self) -> usize {
        self.tables
            .values()
            .map(|t| t.custom.len() + t.default.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `mapping` is driven by `key_code`.
///
/// Mouse modes are looked up by mode only and never match a key.
fn bound_to_key(mapping: &KeyToTouchMappingInfo, key_code: KeyCode) -> bool {
    match mapping.mapping_type {
        MappingType::SingleKey | MappingType::ObservationKey | MappingType::SkillKey => {
            mapping.key_code == key_code
        }
        MappingType::CombinationKey => mapping.combination_keys.contains(&key_code),
        MappingType::KeyboardObservation => mapping.dpad_key_code_entity.contains(key_code),
        MappingType::MouseLeftFire | MappingType::MouseRightClick | MappingType::MouseRightWalking => false,
    }
}

impl MappingProvider for StaticMappingProvider {
    fn mappings_for_key(&self, device_type: DeviceType, key_code: KeyCode) -> Vec<KeyToTouchMappingInfo> {
        self.tables
            .get(&device_type)
            .map(|table| {
                table
                    .layers()
                    .filter(|m| bound_to_key(m, key_code))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn mapping_for_mode(&self, device_type: DeviceType, mode: MappingType) -> Option<KeyToTouchMappingInfo> {
        self.tables
            .get(&device_type)?
            .layers()
            .find(|m| m.mapping_type == mode)
            .cloned()
    }
}
