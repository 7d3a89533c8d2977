//! Synthesizer configuration.

use serde::{Deserialize, Serialize};

/// Knobs that shape the generated widgets and the list syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Separator for comma-style list fields.
    pub list_separator: char,
    /// Step of fractional number inputs.
    pub float_step: f64,
    /// Rows of list and mapping textareas.
    pub textarea_rows: usize,
    /// Render boolean fields as switches instead of plain checkboxes.
    pub switch_checkboxes: bool,
    /// Attach "enter as JSON" hints to JSON-typed fields.
    pub json_hints: bool,
    /// Label of the submit button.
    pub submit_label: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            list_separator: ',',
            float_step: 0.1,
            textarea_rows: 4,
            switch_checkboxes: false,
            json_hints: true,
            submit_label: "Submit".to_string(),
        }
    }
}

impl SynthConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list separator.
    #[must_use]
    pub fn list_separator(mut self, separator: char) -> Self {
        self.list_separator = separator;
        self
    }

    /// Sets the step of fractional number inputs.
    #[must_use]
    pub fn float_step(mut self, step: f64) -> Self {
        self.float_step = step;
        self
    }

    /// Sets the number of textarea rows.
    #[must_use]
    pub fn textarea_rows(mut self, rows: usize) -> Self {
        self.textarea_rows = rows;
        self
    }

    /// Renders booleans as switches.
    #[must_use]
    pub fn switches(mut self, enabled: bool) -> Self {
        self.switch_checkboxes = enabled;
        self
    }

    /// Enables or disables JSON hints.
    #[must_use]
    pub fn json_hints(mut self, enabled: bool) -> Self {
        self.json_hints = enabled;
        self
    }

    /// Sets the submit button label.
    #[must_use]
    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SynthConfig =
            serde_json::from_str(r#"{ "list_separator": ";", "textarea_rows": 6 }"#).unwrap();
        assert_eq!(config.list_separator, ';');
        assert_eq!(config.textarea_rows, 6);
        assert_eq!(config.submit_label, "Submit");
        assert!(config.json_hints);
    }

    #[test]
    fn test_builder() {
        let config = SynthConfig::new()
            .switches(true)
            .submit_label("Save")
            .float_step(0.25);
        assert!(config.switch_checkboxes);
        assert_eq!(config.submit_label, "Save");
        assert_eq!(config.float_step, 0.25);
    }
}
