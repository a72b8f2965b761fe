use std::{borrow::Cow, time::Duration};

use crate::{
    domain::FieldType,
    presentation::{FieldRenderer, RenderPalette, RendererRegistry},
};

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    /// Ask for a second close key press before discarding unsaved changes.
    pub confirm_exit: bool,
    pub show_help: bool,
    pub palette: RenderPalette,
    pub registry: RendererRegistry,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            palette: RenderPalette::default(),
            registry: RendererRegistry::with_builtin(),
        }
    }
}

impl UiOptions {
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_palette(mut self, palette: RenderPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register or replace the renderer for one field type.
    pub fn with_renderer(mut self, kind: FieldType, renderer: impl FieldRenderer + 'static) -> Self {
        self.registry.register(kind, renderer);
        self
    }

    pub fn with_numeric_step(mut self, step: f64) -> Self {
        self.palette.numeric = self.palette.numeric.with_step(step);
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<Cow<'static, str>>) -> Self {
        self.palette.numeric = self.palette.numeric.with_currency(symbol);
        self
    }

    pub fn with_bool_labels(
        mut self,
        true_label: impl Into<Cow<'static, str>>,
        false_label: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.palette.choices = self.palette.choices.with_bool_labels(true_label, false_label);
        self
    }

    pub fn with_mask_char(mut self, mask: char) -> Self {
        self.palette = self.palette.with_mask_char(mask);
        self
    }
}
