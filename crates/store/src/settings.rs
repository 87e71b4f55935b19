//! Display preferences.
//!
//! Stored as one JSON object under [`SETTINGS_KEY`] in the `sync` area.
//! Reading is lenient: each field that is missing or has the wrong shape
//! falls back to its default on its own.

use crate::storage::{KeyValueStorage, StorageArea};
use core_types::CoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SETTINGS_KEY: &str = "extension_settings";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    #[default]
    Wavy,
    Solid,
    Dotted,
    Dashed,
    None,
}

impl HighlightStyle {
    pub fn decoration_class(self) -> &'static str {
        match self {
            HighlightStyle::Wavy => "decoration-wavy",
            HighlightStyle::Solid => "decoration-solid",
            HighlightStyle::Dotted => "decoration-dotted",
            HighlightStyle::Dashed => "decoration-dashed",
            HighlightStyle::None => "decoration-none",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_translation: bool,
    pub highlight_style: HighlightStyle,
    pub theme: Theme,
    pub highlight_color: String,
    pub translation_bg_color: String,
    pub translation_text_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_translation: true,
            highlight_style: HighlightStyle::Wavy,
            theme: Theme::Auto,
            highlight_color: "#3b82f6".to_string(),
            translation_bg_color: "#3b82f6".to_string(),
            translation_text_color: "#ffffff".to_string(),
        }
    }
}

impl Settings {
    /// Current snapshot; defaults when nothing is stored.
    pub fn load(storage: &KeyValueStorage) -> Self {
        match storage.get(StorageArea::Sync, SETTINGS_KEY) {
            Some(value) => Self::from_value(&value),
            None => Self::default(),
        }
    }

    pub fn save(&self, storage: &KeyValueStorage) -> Result<(), CoreError> {
        storage.set(StorageArea::Sync, SETTINGS_KEY, self)
    }

    pub fn from_value(value: &Value) -> Self {
        let mut settings = Self::default();
        let Some(map) = value.as_object() else {
            log::warn!(target: "store.settings", "stored settings are not an object; using defaults");
            return settings;
        };
        read_field(map, "showTranslation", &mut settings.show_translation);
        read_field(map, "highlightStyle", &mut settings.highlight_style);
        read_field(map, "theme", &mut settings.theme);
        read_field(map, "highlightColor", &mut settings.highlight_color);
        read_field(map, "translationBgColor", &mut settings.translation_bg_color);
        read_field(map, "translationTextColor", &mut settings.translation_text_color);
        settings
    }
}

fn read_field<T: DeserializeOwned>(map: &Map<String, Value>, name: &str, slot: &mut T) {
    let Some(raw) = map.get(name) else {
        return;
    };
    match T::deserialize(raw) {
        Ok(value) => *slot = value,
        Err(err) => {
            log::debug!(target: "store.settings", "ignoring settings field {name}: {err}");
        }
    }
}
