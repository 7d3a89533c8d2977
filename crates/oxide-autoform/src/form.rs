//! Bootstrap 5 HTML presenter.

use std::collections::HashMap;

use ironhtml::html;
use ironhtml::typed::{Document, Element};
use ironhtml_elements::{Body, Div, Head, Html, Li, Link, Meta, Title, Ul, H1};
use serde_json::Value;

use crate::config::SynthConfig;
use crate::convert::RawInput;
use crate::error::ValidationErrors;
use crate::present::Presenter;
use crate::widgets::{bootstrap_widget, html_escape, WidgetAttrs, WidgetKind, WidgetRequest};

#[derive(Debug, Clone)]
enum FormItem {
    Field {
        request: WidgetRequest,
        value: Option<String>,
    },
    SectionStart(String),
    SectionEnd,
}

/// Presenter that records one pass and renders it as a Bootstrap 5 form.
///
/// Without submitted data every control shows its seed. With submitted
/// data (an HTML form post, keyed by dotted field name) each control
/// answers with what was posted; an unchecked checkbox is absent from a
/// post and reads as `false`.
///
/// Errors are only rendered for submitted data. A first render shows the
/// seeds without complaining about them.
#[derive(Debug, Clone)]
pub struct BootstrapForm<'a> {
    config: SynthConfig,
    data: Option<&'a HashMap<String, String>>,
    items: Vec<FormItem>,
    errors: Vec<String>,
    field_errors: ValidationErrors,
    structured: Vec<Value>,
}

impl<'a> BootstrapForm<'a> {
    /// Creates a presenter for a first render.
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            data: None,
            items: Vec::new(),
            errors: Vec::new(),
            field_errors: ValidationErrors::new(),
            structured: Vec::new(),
        }
    }

    /// Creates a presenter answering from submitted form data.
    pub fn with_data(config: SynthConfig, data: &'a HashMap<String, String>) -> Self {
        Self {
            data: Some(data),
            ..Self::new(config)
        }
    }

    /// Pass-level errors displayed so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Per-field errors of the last failed pass.
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// Renders the recorded pass as a complete form.
    pub fn finish(&self, action: &str, method: &str) -> String {
        let mut form = html! {
            form.action(#action).method(#method)
        };

        let submitted = self.data.is_some();

        if submitted && !self.errors.is_empty() {
            form = form.child::<Div, _>(|d| {
                d.class("alert alert-danger")
                    .attr("role", "alert")
                    .child::<Ul, _>(|ul| {
                        ul.class("mb-0")
                            .children(self.errors.iter(), |e, li: Element<Li>| li.text(e))
                    })
            });
        }

        let body = self.render_items(submitted);
        form = form.child::<Div, _>(|d| d.raw(&body));

        let submit_label = self.config.submit_label.as_str();
        form = form.child::<Div, _>(|d| {
            let btn = html! {
                button.type_("submit").class("btn btn-primary") {
                    #submit_label
                }
            };
            d.raw(btn.render())
        });

        let mut html = form.render();
        for value in &self.structured {
            html.push_str(&render_structured(value));
        }
        html
    }

    fn render_items(&self, show_errors: bool) -> String {
        let mut stack: Vec<(String, Vec<String>)> = vec![(String::new(), Vec::new())];

        for item in &self.items {
            match item {
                FormItem::Field { request, value } => {
                    let errors = self
                        .field_errors
                        .get(&request.name)
                        .filter(|_| show_errors)
                        .map(<[String]>::to_vec)
                        .unwrap_or_default();
                    let html =
                        render_bootstrap_field(request, value.as_deref(), &errors, &self.config);
                    if let Some((_, parts)) = stack.last_mut() {
                        parts.push(html);
                    }
                }
                FormItem::SectionStart(label) => stack.push((label.clone(), Vec::new())),
                FormItem::SectionEnd => close_section(&mut stack),
            }
        }

        while stack.len() > 1 {
            close_section(&mut stack);
        }
        stack
            .pop()
            .map(|(_, parts)| parts.join("\n"))
            .unwrap_or_default()
    }
}

fn close_section(stack: &mut Vec<(String, Vec<String>)>) {
    if stack.len() < 2 {
        return;
    }
    if let Some((label, parts)) = stack.pop() {
        let card = render_section(&label, &parts.join("\n"));
        if let Some((_, parent)) = stack.last_mut() {
            parent.push(card);
        }
    }
}

fn render_section(label: &str, body: &str) -> String {
    format!(
        r#"<div class="card mb-4">
    <div class="card-header">{}</div>
    <div class="card-body">
        {}
    </div>
</div>"#,
        html_escape(label),
        body
    )
}

/// Wraps rendered content in a standalone Bootstrap 5 page.
pub fn render_page(title: &str, content: &str) -> String {
    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", "en")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Meta, _>(|m| {
                            m.attr("name", "viewport")
                                .attr("content", "width=device-width, initial-scale=1.0")
                        })
                        .child::<Title, _>(|t| t.text(title))
                        .child::<Link, _>(|l| {
                            l.attr("href", "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css")
                                .attr("rel", "stylesheet")
                        })
                })
                .child::<Body, _>(|body| {
                    body.child::<Div, _>(|main| {
                        main.class("container py-4")
                            .child::<H1, _>(|h| h.class("h3 mb-4").text(title))
                            .raw(content)
                    })
                })
        })
        .build()
}

fn render_structured(value: &Value) -> String {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    format!(
        r#"<pre class="bg-light border rounded p-3 mt-3"><code>{}</code></pre>"#,
        html_escape(&text)
    )
}

impl Presenter for BootstrapForm<'_> {
    fn request_input(&mut self, request: &WidgetRequest) -> RawInput {
        let (input, value) = match self.data {
            None => {
                let value = match &request.seed {
                    RawInput::Absent => None,
                    seed => Some(seed.to_string()),
                };
                (request.seed.clone(), value)
            }
            Some(data) => match data.get(&request.name) {
                Some(text) => (RawInput::Text(text.clone()), Some(text.clone())),
                None if request.kind == WidgetKind::Checkbox => (RawInput::Boolean(false), None),
                None => (RawInput::Absent, None),
            },
        };

        self.items.push(FormItem::Field {
            request: request.clone(),
            value,
        });
        input
    }

    fn display_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn display_structured(&mut self, value: &Value) {
        self.structured.push(value.clone());
    }

    fn begin_section(&mut self, label: &str) {
        self.items.push(FormItem::SectionStart(label.to_string()));
    }

    fn end_section(&mut self) {
        self.items.push(FormItem::SectionEnd);
    }

    fn display_field_errors(&mut self, errors: &ValidationErrors) {
        self.field_errors = errors.clone();
    }
}

/// Renders one requested field with Bootstrap 5 styling.
pub fn render_bootstrap_field(
    request: &WidgetRequest,
    value: Option<&str>,
    errors: &[String],
    config: &SynthConfig,
) -> String {
    let widget = bootstrap_widget(request, config);
    let is_checkbox = widget.input_type() == "checkbox";
    let id = format!("id_{}", request.name);

    let mut attrs = WidgetAttrs::new();
    attrs.set("id", &id);
    if !errors.is_empty() {
        attrs.set("class", "is-invalid");
    }
    if request.required && !is_checkbox {
        attrs.set("required", "required");
    }

    let widget_html = widget.render(&request.name, value, &attrs);

    // Checkboxes carry their own label.
    let label_html = if is_checkbox {
        String::new()
    } else {
        let required_marker = if request.required { " *" } else { "" };
        let label_text = format!("{}{}", request.label, required_marker);
        html! {
            label.for_(#id).class("form-label") { #label_text }
        }
        .render()
    };

    let help_text = request.help_text.clone();

    html! { div.class("mb-3") }
        .raw(&label_html)
        .raw(&widget_html)
        .children(errors, |error, div: Element<Div>| {
            div.class("invalid-feedback").text(error)
        })
        .when(help_text.is_some(), |d| {
            d.child::<Div, _>(|h| {
                h.class("form-text")
                    .text(help_text.as_deref().unwrap_or(""))
            })
        })
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTag;
    use crate::widgets::NumberStep;

    fn request(name: &str, kind: WidgetKind, seed: RawInput) -> WidgetRequest {
        WidgetRequest {
            name: name.to_string(),
            label: name.to_string(),
            kind,
            type_tag: TypeTag::String,
            seed,
            help_text: None,
            required: true,
        }
    }

    #[test]
    fn test_render_field_no_errors() {
        let mut req = request("email", WidgetKind::TextInput, RawInput::Absent);
        req.help_text = Some("We will never share your email".to_string());

        let html =
            render_bootstrap_field(&req, Some("a@example.com"), &[], &SynthConfig::default());
        assert!(html.contains("form-label"));
        assert!(html.contains("email *"));
        assert!(html.contains("We will never share your email"));
        assert!(html.contains(r#"required="required""#));
        assert!(!html.contains("is-invalid"));
    }

    #[test]
    fn test_render_field_with_errors() {
        let req = request(
            "age",
            WidgetKind::NumberInput {
                step: NumberStep::Integer,
            },
            RawInput::Integer(0),
        );
        let html = render_bootstrap_field(
            &req,
            Some("-5"),
            &["Ensure this value is greater than or equal to 0.".to_string()],
            &SynthConfig::default(),
        );
        assert!(html.contains("is-invalid"));
        assert!(html.contains("invalid-feedback"));
        assert!(html.contains("greater than or equal to 0."));
    }

    #[test]
    fn test_checkbox_has_no_outer_label_or_required() {
        let req = request("stream", WidgetKind::Checkbox, false.into());
        let html = render_bootstrap_field(&req, Some("true"), &[], &SynthConfig::default());
        assert!(!html.contains("form-label"));
        assert!(html.contains("form-check-label"));
        assert!(!html.contains("required"));
    }

    #[test]
    fn test_first_render_uses_seeds() {
        let mut form = BootstrapForm::new(SynthConfig::default());
        let input = form.request_input(&request("name", WidgetKind::TextInput, "Alice".into()));
        assert_eq!(input, RawInput::Text("Alice".to_string()));

        let html = form.finish("/submit", "post");
        assert!(html.contains(r#"value="Alice""#));
        assert!(html.contains("Submit"));
        assert!(!html.contains("alert-danger"));
    }

    #[test]
    fn test_fields_render_inside_the_form() {
        let mut form = BootstrapForm::new(SynthConfig::default());
        form.request_input(&request("name", WidgetKind::TextInput, "Alice".into()));

        let html = form.finish("/submit", "post");
        let field = html.find(r#"name="name""#).unwrap();
        let button = html.find("btn btn-primary").unwrap();
        assert!(html.starts_with("<form"));
        assert!(field < button);
        assert!(button < html.find("</form>").unwrap());
    }

    #[test]
    fn test_submitted_data_answers_requests() {
        let data = HashMap::from([("name".to_string(), "Bob".to_string())]);
        let mut form = BootstrapForm::with_data(SynthConfig::default(), &data);

        assert_eq!(
            form.request_input(&request("name", WidgetKind::TextInput, "Alice".into())),
            RawInput::Text("Bob".to_string())
        );
        assert_eq!(
            form.request_input(&request("stream", WidgetKind::Checkbox, true.into())),
            RawInput::Boolean(false)
        );
        assert_eq!(
            form.request_input(&request("age", WidgetKind::TextInput, RawInput::Integer(3))),
            RawInput::Absent
        );
    }

    #[test]
    fn test_sections_render_as_cards() {
        let mut form = BootstrapForm::new(SynthConfig::default().submit_label("Place order"));
        form.request_input(&request("order_id", WidgetKind::TextInput, "".into()));
        form.begin_section("shipping_address");
        form.request_input(&request(
            "shipping_address.city",
            WidgetKind::TextInput,
            "".into(),
        ));
        form.end_section();

        let html = form.finish("/orders", "post");
        assert!(html.contains(r#"<div class="card-header">shipping_address</div>"#));
        assert!(html.contains(r#"name="shipping_address.city""#));
        assert!(html.contains("Place order"));
        let card = html.find("card-header").unwrap();
        let order_id = html.find(r#"name="order_id""#).unwrap();
        assert!(order_id < card);
    }

    #[test]
    fn test_errors_are_rendered() {
        let data = HashMap::from([("age".to_string(), "-5".to_string())]);
        let mut form = BootstrapForm::with_data(SynthConfig::default(), &data);
        form.request_input(&request("age", WidgetKind::TextInput, "-5".into()));
        form.display_error("Validation error: age: too small");
        let mut errors = ValidationErrors::new();
        errors.add("age", "too small");
        form.display_field_errors(&errors);

        let html = form.finish("/", "post");
        assert!(html.contains("alert alert-danger"));
        assert!(html.contains("Validation error: age: too small"));
        assert!(html.contains("invalid-feedback"));
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn test_structured_values_follow_the_form() {
        let mut form = BootstrapForm::new(SynthConfig::default());
        form.display_structured(&serde_json::json!({ "name": "<Alice>" }));
        let html = form.finish("/", "post");
        assert!(html.contains("<pre"));
        assert!(html.contains("&lt;Alice&gt;"));
    }

    #[test]
    fn test_first_render_hides_errors() {
        let mut form = BootstrapForm::new(SynthConfig::default());
        form.request_input(&request("price", WidgetKind::TextInput, "0".into()));
        form.display_error("Validation error: price: too small");
        let mut errors = ValidationErrors::new();
        errors.add("price", "too small");
        form.display_field_errors(&errors);

        let html = form.finish("/", "post");
        assert!(!html.contains("alert-danger"));
        assert!(!html.contains("is-invalid"));
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn test_render_page() {
        let html = render_page("Order", "<form></form>");
        assert!(html.to_lowercase().starts_with("<!doctype html>"));
        assert!(html.contains("<title>Order</title>"));
        assert!(html.contains("bootstrap.min.css"));
        assert!(html.contains("<form></form>"));
    }
}
