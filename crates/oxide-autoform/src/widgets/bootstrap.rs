//! Bootstrap 5 form widgets.

use super::{html_escape, NumberStep, Widget, WidgetAttrs};

/// Bootstrap 5 input widget (text, number, date, datetime-local).
#[derive(Debug, Clone)]
pub struct BootstrapTextInput {
    /// The HTML input type.
    pub input_type: String,
    /// Value of the `step` attribute.
    pub step: Option<String>,
}

impl Default for BootstrapTextInput {
    fn default() -> Self {
        Self {
            input_type: "text".to_string(),
            step: None,
        }
    }
}

impl BootstrapTextInput {
    /// Creates a new text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a number input.
    pub fn number(step: NumberStep) -> Self {
        let step = match step {
            NumberStep::Integer => "1".to_string(),
            NumberStep::Fractional(size) => size.to_string(),
        };
        Self {
            input_type: "number".to_string(),
            step: Some(step),
        }
    }

    /// Creates a date picker.
    pub fn date() -> Self {
        Self {
            input_type: "date".to_string(),
            ..Default::default()
        }
    }

    /// Creates a date and time picker.
    pub fn datetime() -> Self {
        Self {
            input_type: "datetime-local".to_string(),
            step: Some("1".to_string()),
        }
    }
}

impl Widget for BootstrapTextInput {
    fn render(&self, name: &str, value: Option<&str>, attrs: &WidgetAttrs) -> String {
        let value_attr = value
            .map(|v| format!(r#" value="{}""#, html_escape(v)))
            .unwrap_or_default();

        let step_attr = self
            .step
            .as_ref()
            .map(|s| format!(r#" step="{s}""#))
            .unwrap_or_default();

        let id = attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"));

        let mut class = "form-control".to_string();
        if let Some(extra_class) = attrs.get("class") {
            class = format!("{class} {extra_class}");
        }

        let extra_attrs = attrs.extra_html();

        format!(
            r#"<input type="{}" class="{}" id="{}" name="{}"{}{}{extra_attrs}>"#,
            self.input_type,
            class,
            html_escape(&id),
            html_escape(name),
            value_attr,
            step_attr
        )
    }

    fn input_type(&self) -> &str {
        &self.input_type
    }
}

/// Bootstrap 5 textarea widget.
#[derive(Debug, Clone)]
pub struct BootstrapTextarea {
    /// Number of rows.
    pub rows: usize,
}

impl BootstrapTextarea {
    /// Creates a new textarea with the specified rows.
    pub fn new(rows: usize) -> Self {
        Self { rows }
    }
}

impl Widget for BootstrapTextarea {
    fn render(&self, name: &str, value: Option<&str>, attrs: &WidgetAttrs) -> String {
        let content = value.map(html_escape).unwrap_or_default();
        let id = attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"));

        let mut class = "form-control".to_string();
        if let Some(extra_class) = attrs.get("class") {
            class = format!("{class} {extra_class}");
        }

        let extra_attrs = attrs.extra_html();

        format!(
            r#"<textarea class="{}" id="{}" name="{}" rows="{}"{extra_attrs}>{}</textarea>"#,
            class,
            html_escape(&id),
            html_escape(name),
            self.rows,
            content
        )
    }

    fn input_type(&self) -> &str {
        "textarea"
    }
}

/// Bootstrap 5 checkbox widget.
#[derive(Debug, Clone, Default)]
pub struct BootstrapCheckbox {
    /// Label for the checkbox.
    pub label: Option<String>,
    /// Whether to use switch style.
    pub is_switch: bool,
}

impl BootstrapCheckbox {
    /// Creates a new checkbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a switch-style checkbox.
    pub fn switch() -> Self {
        Self {
            is_switch: true,
            ..Default::default()
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Widget for BootstrapCheckbox {
    fn render(&self, name: &str, value: Option<&str>, attrs: &WidgetAttrs) -> String {
        let id = attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"));
        let checked = value.is_some_and(|v| v == "true" || v == "on" || v == "1");
        let checked_attr = if checked { " checked" } else { "" };

        let wrapper_class = if self.is_switch {
            "form-check form-switch"
        } else {
            "form-check"
        };

        let mut class = "form-check-input".to_string();
        if let Some(extra_class) = attrs.get("class") {
            class = format!("{class} {extra_class}");
        }

        let label_html = self
            .label
            .as_ref()
            .map(|l| {
                format!(
                    r#"<label class="form-check-label" for="{}">{}</label>"#,
                    html_escape(&id),
                    html_escape(l)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div class="{}">
  <input class="{}" type="checkbox" id="{}" name="{}" value="true"{checked_attr}>
  {}
</div>"#,
            wrapper_class,
            class,
            html_escape(&id),
            html_escape(name),
            label_html
        )
    }

    fn input_type(&self) -> &str {
        "checkbox"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_text_input() {
        let widget = BootstrapTextInput::new();
        let html = widget.render("username", None, &WidgetAttrs::new());
        assert!(html.contains(r#"type="text""#));
        assert!(html.contains(r#"class="form-control""#));
        assert!(html.contains(r#"name="username""#));
        assert!(!html.contains("value="));
        assert!(!html.contains("step="));
    }

    #[test]
    fn test_bootstrap_number_steps() {
        let whole = BootstrapTextInput::number(NumberStep::Integer);
        let html = whole.render("age", Some("30"), &WidgetAttrs::new());
        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"step="1""#));
        assert!(html.contains(r#"value="30""#));

        let fractional = BootstrapTextInput::number(NumberStep::Fractional(0.1));
        let html = fractional.render("temperature", None, &WidgetAttrs::new());
        assert!(html.contains(r#"step="0.1""#));
    }

    #[test]
    fn test_bootstrap_pickers() {
        let html = BootstrapTextInput::datetime().render(
            "date",
            Some("2024-05-01T09:30:00"),
            &WidgetAttrs::new(),
        );
        assert!(html.contains(r#"type="datetime-local""#));
        assert!(html.contains(r#"value="2024-05-01T09:30:00""#));

        let html = BootstrapTextInput::date().render("birthday", None, &WidgetAttrs::new());
        assert!(html.contains(r#"type="date""#));
        assert_eq!(BootstrapTextInput::date().input_type(), "date");
    }

    #[test]
    fn test_bootstrap_textarea() {
        let widget = BootstrapTextarea::new(6);
        let html = widget.render("tags", Some("a, <b>"), &WidgetAttrs::new());
        assert!(html.contains(r#"class="form-control""#));
        assert!(html.contains(r#"rows="6""#));
        assert!(html.contains("a, &lt;b&gt;"));
    }

    #[test]
    fn test_bootstrap_checkbox() {
        let widget = BootstrapCheckbox::new().label("I agree");
        let html = widget.render("agree", Some("true"), &WidgetAttrs::new());
        assert!(html.contains("form-check"));
        assert!(html.contains("checked"));
        assert!(html.contains("I agree"));
    }

    #[test]
    fn test_bootstrap_switch() {
        let widget = BootstrapCheckbox::switch();
        let html = widget.render("enabled", Some("false"), &WidgetAttrs::new());
        assert!(html.contains("form-switch"));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn test_attrs_are_applied() {
        let mut attrs = WidgetAttrs::new();
        attrs.set("id", "id_custom");
        attrs.set("class", "is-invalid");
        attrs.set("required", "required");
        let html = BootstrapTextInput::new().render("name", None, &attrs);
        assert!(html.contains(r#"id="id_custom""#));
        assert!(html.contains(r#"class="form-control is-invalid""#));
        assert!(html.contains(r#" required="required""#));
    }
}
