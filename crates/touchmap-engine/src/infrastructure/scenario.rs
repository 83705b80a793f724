//! Replay scenarios.
//!
//! A scenario is a TOML file holding a set of mappings and a timed list of
//! input steps. The `touchmap-replay` binary feeds the steps through an
//! engine and prints every emitted touch entity.
//!
//! ```toml
//! device_type = "keyboard"
//!
//! [window]
//! max_width = 2400
//! max_height = 1080
//!
//! [[mappings]]
//! type = "single_key"
//! key = "Q"
//! x = 2045
//! y = 1003
//!
//! [[mappings]]
//! type = "keyboard_observation"
//! dpad = { up = "W", down = "S", left = "A", right = "D" }
//! x = 400
//! y = 800
//! x_step = 10
//! y_step = 10
//!
//! [[steps]]
//! key_down = "W"
//!
//! [[steps]]
//! wait_ms = 200
//!
//! [[steps]]
//! key_up = "W"
//! ```
//!
//! Key names go through [`touchmap_core::keymap::key_name_to_code`]; a bare
//! number is taken as a raw key code.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use touchmap_core::keymap::key_name_to_code;
use touchmap_core::{
    DeviceType, DpadKeyCodeEntity, InputEvent, KeyCode, KeyEvent, KeyToTouchMappingInfo, MappingType, MouseButton,
    PointerEvent, WindowInfo,
};
use tracing::{debug, info};

use super::mapping_store::{MappingLayer, StaticMappingProvider};
use super::storage::config::{ConfigError, EngineConfig};
use crate::application::engine::{EngineSettings, InputToTouchEngine};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("I/O error reading scenario at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown key name {0:?}")]
    UnknownKey(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ── Scenario schema types ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    /// Device class the key steps come from.
    #[serde(default = "default_device_type")]
    pub device_type: DeviceType,
    /// Overrides the configured crosshair readiness when present.
    #[serde(default)]
    pub crosshair_ready: Option<bool>,
    /// Overrides the configured window bounds when present.
    #[serde(default)]
    pub window: Option<WindowEntry>,
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct WindowEntry {
    pub max_width: i32,
    pub max_height: i32,
}

/// One mapping record with key names instead of codes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MappingEntry {
    #[serde(rename = "type")]
    pub mapping_type: MappingType,
    /// Defaults to `mouse` for mouse modes, to the scenario's device otherwise.
    #[serde(default)]
    pub device: Option<DeviceType>,
    #[serde(default)]
    pub key: Option<String>,
    /// Modifier then trigger, for combination mappings.
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub dpad: Option<DpadEntry>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub x_step: i32,
    #[serde(default)]
    pub y_step: i32,
    #[serde(default)]
    pub radius: i32,
    #[serde(default)]
    pub skill_range: i32,
    #[serde(default)]
    pub delay_time: i32,
    /// Puts the record in the custom layer instead of the default one.
    #[serde(default)]
    pub custom: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DpadEntry {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

/// One input step.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    KeyDown(String),
    KeyUp(String),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    MouseMove { dx: i32, dy: i32 },
    /// Advances the clock, letting the ticker run.
    WaitMs(u64),
    /// Flips the crosshair readiness signal.
    Crosshair(bool),
}

fn default_device_type() -> DeviceType {
    DeviceType::Keyboard
}

fn key_code(name: &str) -> Result<KeyCode, ScenarioError> {
    key_name_to_code(name).ok_or_else(|| ScenarioError::UnknownKey(name.to_string()))
}

impl MappingEntry {
    fn device(&self, scenario_device: DeviceType) -> DeviceType {
        match (self.device, self.mapping_type) {
            (Some(device), _) => device,
            (None, MappingType::MouseLeftFire | MappingType::MouseRightClick | MappingType::MouseRightWalking) => {
                DeviceType::Mouse
            }
            (None, _) => scenario_device,
        }
    }

    /// Builds the mapping record. Combination key counts are left for the
    /// handler to judge.
    pub fn to_mapping(&self) -> Result<KeyToTouchMappingInfo, ScenarioError> {
        let key = match &self.key {
            Some(name) => key_code(name)?,
            None => touchmap_core::domain::mapping::UNSET_KEY_CODE,
        };
        let combination_keys = self
            .keys
            .iter()
            .map(|name| key_code(name))
            .collect::<Result<Vec<_>, _>>()?;
        let dpad = match &self.dpad {
            Some(entry) => DpadKeyCodeEntity {
                up: key_code(&entry.up)?,
                down: key_code(&entry.down)?,
                left: key_code(&entry.left)?,
                right: key_code(&entry.right)?,
            },
            None => DpadKeyCodeEntity::default(),
        };
        // A combination is keyed by its trigger when no explicit key is given.
        let key = match (self.mapping_type, combination_keys.get(1)) {
            (MappingType::CombinationKey, Some(&trigger)) if self.key.is_none() => trigger,
            _ => key,
        };

        Ok(KeyToTouchMappingInfo {
            radius: self.radius,
            skill_range: self.skill_range,
            x_step: self.x_step,
            y_step: self.y_step,
            combination_keys,
            dpad_key_code_entity: dpad,
            delay_time: self.delay_time,
            ..KeyToTouchMappingInfo::new(self.mapping_type, key, self.x, self.y)
        })
    }
}

/// A step with key names resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Input(InputEventKind),
    Wait(Duration),
    Crosshair(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum InputEventKind {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    MouseMove(i32, i32),
}

impl InputEventKind {
    fn at(self, action_time: i64) -> InputEvent {
        match self {
            InputEventKind::KeyDown(code) => InputEvent::Key(KeyEvent::down(code, action_time)),
            InputEventKind::KeyUp(code) => InputEvent::Key(KeyEvent::up(code, action_time)),
            InputEventKind::MouseDown(button) => InputEvent::Pointer(PointerEvent::button_down(button, action_time)),
            InputEventKind::MouseUp(button) => InputEvent::Pointer(PointerEvent::button_up(button, action_time)),
            InputEventKind::MouseMove(dx, dy) => InputEvent::Pointer(PointerEvent::motion(dx, dy, action_time)),
        }
    }
}

/// Outcome counts of one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub handled: usize,
    pub discarded: usize,
    /// Scenario clock at the end of the replay, in microseconds.
    pub elapsed_us: i64,
}

impl Scenario {
    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read and
    /// [`ScenarioError::Parse`] if it is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the in-memory provider holding every mapping of the scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownKey`] for an unresolvable key name.
    pub fn build_provider(&self) -> Result<StaticMappingProvider, ScenarioError> {
        let mut provider = StaticMappingProvider::new();
        for entry in &self.mappings {
            let layer = if entry.custom {
                MappingLayer::Custom
            } else {
                MappingLayer::Default
            };
            provider.insert(entry.device(self.device_type), layer, entry.to_mapping()?);
        }
        Ok(provider)
    }

    /// Engine settings from `config`, with the scenario's overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] if `config` is unusable.
    pub fn settings(&self, config: &EngineConfig) -> Result<EngineSettings, ScenarioError> {
        let mut settings = config.to_settings(self.device_type)?;
        if let Some(window) = self.window {
            settings.window_info = WindowInfo::new(window.max_width, window.max_height);
        }
        if let Some(ready) = self.crosshair_ready {
            settings.crosshair_ready = ready;
        }
        Ok(settings)
    }

    fn actions(&self) -> Result<Vec<Action>, ScenarioError> {
        self.steps
            .iter()
            .map(|step| {
                Ok(match step {
                    Step::KeyDown(name) => Action::Input(InputEventKind::KeyDown(key_code(name)?)),
                    Step::KeyUp(name) => Action::Input(InputEventKind::KeyUp(key_code(name)?)),
                    Step::MouseDown(button) => Action::Input(InputEventKind::MouseDown(*button)),
                    Step::MouseUp(button) => Action::Input(InputEventKind::MouseUp(*button)),
                    Step::MouseMove { dx, dy } => Action::Input(InputEventKind::MouseMove(*dx, *dy)),
                    Step::WaitMs(ms) => Action::Wait(Duration::from_millis(*ms)),
                    Step::Crosshair(ready) => Action::Crosshair(*ready),
                })
            })
            .collect()
    }

    /// Feeds every step into `engine`.
    ///
    /// Event times come from a scenario clock that starts at zero and only
    /// advances on `wait_ms` steps. Waits sleep on the tokio clock so a
    /// runtime-driven ticker keeps moving meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownKey`] before any step runs if a step
    /// names an unknown key.
    pub async fn replay(&self, engine: &InputToTouchEngine) -> Result<ReplayReport, ScenarioError> {
        let actions = self.actions()?;
        let mut report = ReplayReport::default();
        info!(steps = actions.len(), "replaying scenario");

        for action in actions {
            match action {
                Action::Input(kind) => match engine.handle_event(&kind.at(report.elapsed_us)) {
                    Ok(()) => report.handled += 1,
                    Err(reason) => {
                        debug!(?kind, %reason, "step discarded");
                        report.discarded += 1;
                    }
                },
                Action::Wait(duration) => {
                    tokio::time::sleep(duration).await;
                    report.elapsed_us += duration.as_micros() as i64;
                }
                Action::Crosshair(ready) => engine.set_crosshair_ready(ready),
            }
        }
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
