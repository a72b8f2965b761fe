use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};
use serde_json::Value;
use tracing::debug;

use crate::{
    domain::{FieldSchema, FormDefinition, SectionSchema},
    form::{ErrorMap, FormSession, FormValues, completion_percentage, path},
};

use super::{
    palette::RenderPalette,
    registry::{FieldContext, RendererRegistry},
};

/// One section, ready to be placed in a list or paragraph.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub title: String,
    pub description: Option<String>,
    /// Rendered lines of every field, in schema order.
    pub fields: Vec<Vec<Line<'static>>>,
}

/// Read-only projection of a form for drawing: walks sections in order and
/// hands every field its value, its error and the renderer for its type.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    definition: &'a FormDefinition,
    values: &'a FormValues,
    errors: &'a ErrorMap,
    registry: &'a RendererRegistry,
    palette: &'a RenderPalette,
    disabled: bool,
}

impl<'a> FormView<'a> {
    pub fn new(
        definition: &'a FormDefinition,
        values: &'a FormValues,
        errors: &'a ErrorMap,
        registry: &'a RendererRegistry,
        palette: &'a RenderPalette,
    ) -> Self {
        Self {
            definition,
            values,
            errors,
            registry,
            palette,
            disabled: false,
        }
    }

    /// Inputs are disabled while a submit is in flight.
    pub fn of_session(
        session: &'a FormSession,
        registry: &'a RendererRegistry,
        palette: &'a RenderPalette,
    ) -> Self {
        Self::new(
            session.definition(),
            session.values(),
            session.errors(),
            registry,
            palette,
        )
        .disabled(session.state().is_submitting())
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn definition(&self) -> &'a FormDefinition {
        self.definition
    }

    pub fn completion(&self) -> u8 {
        completion_percentage(self.values, &self.definition.sections)
    }

    pub fn context(&self, field: &'a FieldSchema, focused: bool, width: usize) -> FieldContext<'a> {
        FieldContext {
            schema: field,
            value: path::lookup(self.values, &field.name),
            error: self.errors.get(&field.name).map(String::as_str),
            disabled: self.disabled,
            focused,
            width,
        }
    }

    /// Lines for one field. A type without a renderer yields a placeholder
    /// for that field alone.
    pub fn field_lines(&self, field: &'a FieldSchema, focused: bool, width: usize) -> Vec<Line<'static>> {
        let ctx = self.context(field, focused, width);
        match self.registry.resolve(&field.kind) {
            Some(renderer) => renderer.render(&ctx, self.palette),
            None => {
                debug!(field = %field.name, kind = %field.kind, "no renderer registered");
                vec![
                    Line::from(Span::styled(field.label.clone(), self.palette.markers.disabled)),
                    Line::from(Span::styled(
                        format!("  unsupported field type `{}`", field.kind),
                        self.palette.markers.invalid,
                    )),
                ]
            }
        }
    }

    /// Route a key press to the renderer of `field`. `Some` carries the
    /// value to write back.
    pub fn handle_key(&self, field: &'a FieldSchema, key: &KeyEvent) -> Option<Value> {
        if self.disabled {
            return None;
        }
        let renderer = self.registry.resolve(&field.kind)?;
        renderer.handle_key(&self.context(field, true, 0), key, self.palette)
    }

    pub fn section(&self, index: usize, focused: Option<usize>, width: usize) -> Option<SectionView> {
        let section = self.definition.sections.get(index)?;
        Some(SectionView {
            title: section_title(section),
            description: section.description.clone(),
            fields: section
                .fields
                .iter()
                .enumerate()
                .map(|(idx, field)| self.field_lines(field, focused == Some(idx), width))
                .collect(),
        })
    }

    pub fn sections(&self, width: usize) -> Vec<SectionView> {
        (0..self.definition.sections.len())
            .filter_map(|index| self.section(index, None, width))
            .collect()
    }
}

fn section_title(section: &SectionSchema) -> String {
    let mut title = match &section.icon {
        Some(icon) => format!("{icon} {}", section.title),
        None => section.title.clone(),
    };
    match section.required {
        Some(true) => title.push_str(" (required)"),
        Some(false) => title.push_str(" (optional)"),
        None => {}
    }
    title
}

/// Flatten rendered lines to plain text, mostly useful for logs and tests.
pub fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{FieldType, ValidationRules};

    fn definition() -> FormDefinition {
        let section = SectionSchema::new("Basics")
            .icon("◆")
            .marked_required(true)
            .field(
                FieldSchema::new("planName", "Plan name", FieldType::Text)
                    .required()
                    .validation(ValidationRules::default().length(Some(2), Some(50))),
            )
            .field(FieldSchema::new("legacy", "Legacy", FieldType::Other("rating".into())))
            .field(FieldSchema::new("active", "Active", FieldType::Checkbox));
        FormDefinition::build(Some("Plan".into()), None, vec![section]).unwrap()
    }

    #[test]
    fn unknown_type_only_affects_its_own_field() {
        let definition = definition();
        let values = FormValues::new();
        let errors = ErrorMap::new();
        let registry = RendererRegistry::with_builtin();
        let palette = RenderPalette::default();
        let view = FormView::new(&definition, &values, &errors, &registry, &palette);
        let section = view.section(0, Some(0), 60).unwrap();
        assert_eq!(section.title, "◆ Basics (required)");
        assert_eq!(section.fields.len(), 3);
        assert!(plain_text(&section.fields[1]).contains("unsupported field type `rating`"));
        assert!(plain_text(&section.fields[2]).contains("[ ] No"));
    }

    #[test]
    fn invalid_field_shows_message_and_marker() {
        let definition = definition();
        let values = match json!({"planName": "A"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut errors = ErrorMap::new();
        errors.insert(
            "planName".into(),
            "Plan name should be between 2-50 characters".into(),
        );
        let registry = RendererRegistry::with_builtin();
        let palette = RenderPalette::default();
        let view = FormView::new(&definition, &values, &errors, &registry, &palette);
        let text = plain_text(&view.section(0, None, 80).unwrap().fields[0]);
        assert!(text.starts_with("Plan name * ✗"));
        assert!(text.contains("✗ Plan name should be between 2-50 characters"));
        assert_eq!(view.completion(), 100);
    }

    #[test]
    fn valid_field_shows_positive_marker() {
        let definition = definition();
        let values = match json!({"planName": "Growth"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let errors = ErrorMap::new();
        let registry = RendererRegistry::with_builtin();
        let palette = RenderPalette::default();
        let view = FormView::new(&definition, &values, &errors, &registry, &palette);
        let text = plain_text(&view.section(0, None, 80).unwrap().fields[0]);
        assert!(text.starts_with("Plan name * ✓"));
    }

    #[test]
    fn disabled_view_ignores_keys() {
        let definition = definition();
        let values = FormValues::new();
        let errors = ErrorMap::new();
        let registry = RendererRegistry::with_builtin();
        let palette = RenderPalette::default();
        let view = FormView::new(&definition, &values, &errors, &registry, &palette);
        let field = &definition.sections[0].fields[0];
        let key = KeyEvent::from(crossterm::event::KeyCode::Char('a'));
        assert_eq!(view.handle_key(field, &key), Some(json!("a")));
        assert_eq!(view.disabled(true).handle_key(field, &key), None);
        let unknown = &definition.sections[0].fields[1];
        assert_eq!(view.handle_key(unknown, &key), None);
    }
}
