//! # touchmap-core
//!
//! Domain types for the input-to-touch mapping engine: mapping records,
//! touch entities, window bounds, directional-pad geometry, the virtual
//! pointer allocator and the raw input events the engine consumes.
//!
//! This crate has zero dependencies on OS APIs, async runtimes or the host's
//! touch pipeline. The engine crate (`touchmap-engine`) builds the mode
//! handlers and the periodic keyboard-observation task on top of it.
//!
//! # Architecture overview
//!
//! A touch-only application can be driven by keyboards, mice and gamepads
//! when each hardware event is translated into a synthetic touch contact:
//!
//! - **`domain`** – What a mapping looks like ([`KeyToTouchMappingInfo`]),
//!   what gets emitted ([`TouchEntity`]), where it may land ([`WindowInfo`]),
//!   how a held direction moves a finger ([`domain::direction`]) and which
//!   pointer ids are live ([`PointerManager`]).
//!
//! - **`event`** – Key and pointer events as delivered by the input source.
//!
//! - **`keymap`** – Host key-code constants and name lookups.

pub mod domain;
pub mod event;
pub mod keymap;

pub use domain::direction::{find_diagonal, is_valid_combination, next_position};
pub use domain::mapping::{
    DpadKeyCodeEntity, DpadKeyItem, DpadKeyType, KeyToTouchMappingInfo, MappingError, MappingType,
};
pub use domain::pointer::{PointerId, PointerManager};
pub use domain::touch::{TouchAction, TouchEntity, TouchPoint};
pub use domain::window::WindowInfo;
pub use event::{
    DeviceType, InputEvent, KeyAction, KeyEvent, MouseButton, PointerEvent, PointerEventAction,
    PointerSourceType,
};
pub use keymap::KeyCode;
