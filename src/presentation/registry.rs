use std::{collections::HashMap, fmt, sync::Arc};

use crossterm::event::KeyEvent;
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use serde_json::Value;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{domain::{FieldSchema, FieldType}, form::is_blank};

use super::{
    palette::{RenderPalette, StatusMarkers},
    renderers,
};

/// Visual state of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Untouched or empty, no error.
    Neutral,
    /// Has a value and no error.
    Valid,
    /// Has an error.
    Invalid,
}

/// Everything a renderer needs to draw one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub schema: &'a FieldSchema,
    pub value: Option<&'a Value>,
    pub error: Option<&'a str>,
    pub disabled: bool,
    pub focused: bool,
    pub width: usize,
}

impl FieldContext<'_> {
    pub fn status(&self) -> FieldStatus {
        if self.error.is_some() {
            FieldStatus::Invalid
        } else if is_blank(self.value) {
            FieldStatus::Neutral
        } else {
            FieldStatus::Valid
        }
    }
}

/// Draws one kind of field and turns key presses into new values. Returning
/// `Some(value)` from [`FieldRenderer::handle_key`] is the change callback:
/// the host writes it back with `set_field(schema.name, value)`.
pub trait FieldRenderer: Send + Sync + fmt::Debug {
    fn display_value(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> String;

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        palette: &RenderPalette,
    ) -> Option<Value> {
        let _ = (ctx, key, palette);
        None
    }

    fn render(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> Vec<Line<'static>> {
        let value = self.display_value(ctx, palette);
        field_lines(ctx, value, palette)
    }
}

/// Label, value, description and error lines shared by the built-in renderers.
pub fn field_lines(
    ctx: &FieldContext<'_>,
    value: String,
    palette: &RenderPalette,
) -> Vec<Line<'static>> {
    let markers = &palette.markers;
    let status = ctx.status();
    let mut label = ctx.schema.label.clone();
    if ctx.schema.required {
        label.push_str(&markers.required_marker);
    }
    let label_style = if ctx.disabled {
        markers.disabled
    } else if ctx.focused {
        markers.focused
    } else {
        markers.neutral
    };
    let mut header = vec![Span::styled(label, label_style)];
    match status {
        FieldStatus::Valid => {
            header.push(Span::raw(" "));
            header.push(Span::styled(markers.valid_symbol.to_string(), markers.valid));
        }
        FieldStatus::Invalid => {
            header.push(Span::raw(" "));
            header.push(Span::styled(
                markers.invalid_symbol.to_string(),
                markers.invalid,
            ));
        }
        FieldStatus::Neutral => {}
    }

    let mut lines = vec![Line::from(header)];
    let width = ctx.width.max(8);
    if ctx.focused && !ctx.disabled {
        let (content, style) = if value.is_empty() {
            (
                ctx.schema.placeholder.clone().unwrap_or_default(),
                markers.disabled,
            )
        } else {
            (value, Style::default())
        };
        lines.extend(boxed_value(&content, width.saturating_sub(6), style, markers));
    } else if value.is_empty() {
        let placeholder = ctx.schema.placeholder.clone().unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("  {placeholder}"),
            markers.disabled,
        )));
    } else {
        let style = if ctx.disabled {
            markers.disabled
        } else {
            Style::default()
        };
        for segment in wrap(&value, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(format!("  {segment}"), style)));
        }
    }
    if let Some(description) = &ctx.schema.description {
        for segment in wrap(description, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(
                format!("  {segment}"),
                markers.disabled,
            )));
        }
    }
    if let Some(error) = ctx.error {
        for segment in wrap(error, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(
                format!("  {} {segment}", markers.invalid_symbol),
                markers.invalid,
            )));
        }
    }
    lines
}

/// The focused value inside a border, padded to the widest wrapped line.
fn boxed_value(
    content: &str,
    inner: usize,
    style: Style,
    markers: &StatusMarkers,
) -> Vec<Line<'static>> {
    let mut segments: Vec<String> = wrap(content, inner.max(1))
        .into_iter()
        .map(|segment| segment.into_owned())
        .collect();
    if segments.is_empty() {
        segments.push(String::new());
    }
    let inner_width = segments
        .iter()
        .map(|segment| UnicodeWidthStr::width(segment.as_str()))
        .max()
        .unwrap_or(0);
    let border = "─".repeat(inner_width + 2);

    let mut lines = vec![Line::from(Span::styled(
        format!("  ┌{border}┐"),
        markers.focused,
    ))];
    for segment in segments {
        let padding = inner_width.saturating_sub(UnicodeWidthStr::width(segment.as_str()));
        lines.push(Line::from(vec![
            Span::styled("  │ ", markers.focused),
            Span::styled(format!("{segment}{}", " ".repeat(padding)), style),
            Span::styled(" │", markers.focused),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("  └{border}┘"),
        markers.focused,
    )));
    lines
}

/// Maps a field type to its renderer. Types without an entry resolve to
/// `None`; the form view renders a placeholder for those fields only.
#[derive(Debug, Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<FieldType, Arc<dyn FieldRenderer>>,
}

impl RendererRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with a renderer for every known field type.
    pub fn with_builtin() -> Self {
        let text: Arc<dyn FieldRenderer> = Arc::new(renderers::TextInput);
        let mut registry = Self::empty();
        for kind in [
            FieldType::Text,
            FieldType::Email,
            FieldType::Tel,
            FieldType::Url,
            FieldType::Date,
            FieldType::Time,
            FieldType::Textarea,
        ] {
            registry.renderers.insert(kind, Arc::clone(&text));
        }
        let options: Arc<dyn FieldRenderer> = Arc::new(renderers::OptionListInput);
        registry
            .renderers
            .insert(FieldType::MultiSelect, Arc::clone(&options));
        registry.renderers.insert(FieldType::CheckboxGroup, options);
        registry.register(FieldType::Number, renderers::NumberInput);
        registry.register(FieldType::Password, renderers::PasswordInput);
        registry.register(FieldType::Select, renderers::SelectInput);
        registry.register(FieldType::Checkbox, renderers::CheckboxInput);
        registry.register(FieldType::Object, renderers::ObjectSummary);
        registry
    }

    pub fn register(&mut self, kind: FieldType, renderer: impl FieldRenderer + 'static) {
        self.renderers.insert(kind, Arc::new(renderer));
    }

    pub fn with(mut self, kind: FieldType, renderer: impl FieldRenderer + 'static) -> Self {
        self.register(kind, renderer);
        self
    }

    pub fn resolve(&self, kind: &FieldType) -> Option<&dyn FieldRenderer> {
        self.renderers.get(kind).map(|renderer| renderer.as_ref())
    }
}
