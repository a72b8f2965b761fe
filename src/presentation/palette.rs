use std::borrow::Cow;

use ratatui::style::{Color, Modifier, Style};

/// Markers and colours for the three visual states of a field.
#[derive(Debug, Clone)]
pub struct StatusMarkers {
    pub valid_symbol: Cow<'static, str>,
    pub invalid_symbol: Cow<'static, str>,
    pub required_marker: Cow<'static, str>,
    pub neutral: Style,
    pub valid: Style,
    pub invalid: Style,
    pub focused: Style,
    pub disabled: Style,
}

impl StatusMarkers {
    pub fn with_symbols(
        mut self,
        valid: impl Into<Cow<'static, str>>,
        invalid: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.valid_symbol = valid.into();
        self.invalid_symbol = invalid.into();
        self
    }

    pub fn with_required_marker(mut self, marker: impl Into<Cow<'static, str>>) -> Self {
        self.required_marker = marker.into();
        self
    }
}

impl Default for StatusMarkers {
    fn default() -> Self {
        Self {
            valid_symbol: Cow::Borrowed("✓"),
            invalid_symbol: Cow::Borrowed("✗"),
            required_marker: Cow::Borrowed(" *"),
            neutral: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            valid: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            invalid: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Labels used by checkbox and option-list renderers.
#[derive(Debug, Clone)]
pub struct ChoiceLabels {
    pub checked: Cow<'static, str>,
    pub unchecked: Cow<'static, str>,
    pub true_label: Cow<'static, str>,
    pub false_label: Cow<'static, str>,
    pub empty_selection: Cow<'static, str>,
}

impl ChoiceLabels {
    pub fn with_bool_labels(
        mut self,
        true_label: impl Into<Cow<'static, str>>,
        false_label: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.true_label = true_label.into();
        self.false_label = false_label.into();
        self
    }
}

impl Default for ChoiceLabels {
    fn default() -> Self {
        Self {
            checked: Cow::Borrowed("[x]"),
            unchecked: Cow::Borrowed("[ ]"),
            true_label: Cow::Borrowed("Yes"),
            false_label: Cow::Borrowed("No"),
            empty_selection: Cow::Borrowed("<none>"),
        }
    }
}

/// Numeric stepping and affixes for number inputs.
#[derive(Debug, Clone)]
pub struct NumericFormat {
    pub step: f64,
    pub currency_symbol: Cow<'static, str>,
    pub percent_symbol: Cow<'static, str>,
}

impl NumericFormat {
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.max(f64::EPSILON);
        self
    }

    pub fn with_currency(mut self, symbol: impl Into<Cow<'static, str>>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }
}

impl Default for NumericFormat {
    fn default() -> Self {
        Self {
            step: 1.0,
            currency_symbol: Cow::Borrowed("₹"),
            percent_symbol: Cow::Borrowed("%"),
        }
    }
}

/// Aggregated render configuration handed to every field renderer.
#[derive(Debug, Clone)]
pub struct RenderPalette {
    pub markers: StatusMarkers,
    pub choices: ChoiceLabels,
    pub numeric: NumericFormat,
    pub mask_char: char,
}

impl RenderPalette {
    pub fn with_markers(mut self, markers: StatusMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_choices(mut self, choices: ChoiceLabels) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_numeric(mut self, numeric: NumericFormat) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn with_mask_char(mut self, mask: char) -> Self {
        self.mask_char = mask;
        self
    }
}

impl Default for RenderPalette {
    fn default() -> Self {
        Self {
            markers: StatusMarkers::default(),
            choices: ChoiceLabels::default(),
            numeric: NumericFormat::default(),
            mask_char: '•',
        }
    }
}
