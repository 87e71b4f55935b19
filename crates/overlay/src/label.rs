use crate::mount::OverlayContent;
use store::Settings;

/// Inline rendering of a star anchor: the word itself, underlined, with the
/// first translation in the corner when enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub corner: Option<String>,
    pub decoration_class: &'static str,
    pub underline_color: String,
    pub corner_color: String,
}

impl Label {
    pub fn new(text: &str, content: &OverlayContent, settings: &Settings) -> Self {
        let corner = settings
            .show_translation
            .then(|| content.first_definition())
            .flatten()
            .map(str::to_string);
        Self {
            text: text.to_string(),
            corner,
            decoration_class: settings.highlight_style.decoration_class(),
            underline_color: settings.highlight_color.clone(),
            corner_color: settings.translation_text_color.clone(),
        }
    }

    pub fn class_list(&self) -> String {
        format!("label underline {}", self.decoration_class)
    }
}
