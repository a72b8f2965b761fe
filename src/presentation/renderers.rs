use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Number, Value};

use crate::{
    domain::{DisplayHint, FieldType, option_matches},
    form::{parse_number, value_to_string},
};

use super::{
    palette::RenderPalette,
    registry::{FieldContext, FieldRenderer},
};

fn current_text(ctx: &FieldContext<'_>) -> String {
    ctx.value.map(value_to_string).unwrap_or_default()
}

/// Shared buffer editing for text-like inputs. Returns the new buffer when the
/// key changed it.
fn edit_text(mut buffer: String, key: &KeyEvent, multiline: bool) -> Option<String> {
    match key.code {
        KeyCode::Char(ch) => {
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                return None;
            }
            buffer.push(ch);
        }
        KeyCode::Enter if multiline => buffer.push('\n'),
        KeyCode::Backspace => {
            buffer.pop()?;
        }
        KeyCode::Delete => {
            if buffer.is_empty() {
                return None;
            }
            buffer.clear();
        }
        _ => return None,
    }
    Some(buffer)
}

/// Single or multi-line free text. Also used for email, tel, url, date and
/// time fields, which only differ in validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextInput;

impl TextInput {
    fn multiline(ctx: &FieldContext<'_>) -> bool {
        ctx.schema.kind == FieldType::Textarea
            || ctx.schema.display_hint == Some(DisplayHint::Multiline)
    }
}

impl FieldRenderer for TextInput {
    fn display_value(&self, ctx: &FieldContext<'_>, _palette: &RenderPalette) -> String {
        let text = current_text(ctx);
        if Self::multiline(ctx) {
            text.replace('\n', " ⏎ ")
        } else {
            text
        }
    }

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        _palette: &RenderPalette,
    ) -> Option<Value> {
        edit_text(current_text(ctx), key, Self::multiline(ctx)).map(Value::String)
    }
}

/// Masked text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordInput;

impl FieldRenderer for PasswordInput {
    fn display_value(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> String {
        let len = current_text(ctx).chars().count();
        std::iter::repeat_n(palette.mask_char, len).collect()
    }

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        _palette: &RenderPalette,
    ) -> Option<Value> {
        edit_text(current_text(ctx), key, false).map(Value::String)
    }
}

/// Numeric input with optional currency prefix or percent suffix. Left and
/// Right step the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberInput;

impl NumberInput {
    /// Typed text becomes a JSON number only when it reads back unchanged, so
    /// partial input such as `12.` or `-` survives as text until complete.
    fn settle(buffer: String) -> Value {
        let trimmed = buffer.trim();
        if let Ok(int) = trimmed.parse::<i64>()
            && int.to_string() == trimmed
        {
            return Value::from(int);
        }
        if let Ok(float) = trimmed.parse::<f64>()
            && let Some(number) = Number::from_f64(float)
            && number.to_string() == trimmed
        {
            return Value::Number(number);
        }
        Value::String(buffer)
    }

    fn step(ctx: &FieldContext<'_>, palette: &RenderPalette, direction: f64) -> Value {
        let current = ctx.value.and_then(parse_number).unwrap_or(0.0);
        let next = current + palette.numeric.step * direction;
        if next.fract() == 0.0 && next.abs() < i64::MAX as f64 {
            Value::from(next as i64)
        } else {
            Number::from_f64(next).map_or(Value::Null, Value::Number)
        }
    }
}

impl FieldRenderer for NumberInput {
    fn display_value(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> String {
        let text = current_text(ctx);
        if text.is_empty() {
            return text;
        }
        match ctx.schema.display_hint {
            Some(DisplayHint::CurrencyPrefix) => {
                format!("{} {text}", palette.numeric.currency_symbol)
            }
            Some(DisplayHint::PercentSuffix) => {
                format!("{text} {}", palette.numeric.percent_symbol)
            }
            _ => text,
        }
    }

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        palette: &RenderPalette,
    ) -> Option<Value> {
        match key.code {
            KeyCode::Left => Some(Self::step(ctx, palette, -1.0)),
            KeyCode::Right => Some(Self::step(ctx, palette, 1.0)),
            _ => edit_text(current_text(ctx), key, false).map(Self::settle),
        }
    }
}

/// Single choice cycled with Left and Right.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectInput;

impl FieldRenderer for SelectInput {
    fn display_value(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> String {
        match ctx.value {
            Some(value) if !value_to_string(value).is_empty() => ctx
                .schema
                .option_label(value)
                .map(str::to_string)
                .unwrap_or_else(|| value_to_string(value)),
            _ => palette.choices.empty_selection.to_string(),
        }
    }

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        _palette: &RenderPalette,
    ) -> Option<Value> {
        let options = &ctx.schema.options;
        if options.is_empty() {
            return None;
        }
        let current = ctx.value.and_then(|value| {
            options
                .iter()
                .position(|option| option_matches(&option.value, value))
        });
        let next = match (key.code, current) {
            (KeyCode::Right, Some(idx)) => (idx + 1) % options.len(),
            (KeyCode::Left, Some(0)) => options.len() - 1,
            (KeyCode::Left, Some(idx)) => idx - 1,
            (KeyCode::Right, None) => 0,
            (KeyCode::Left, None) => options.len() - 1,
            _ => return None,
        };
        Some(options[next].value.clone())
    }
}

/// Multi-select and checkbox-group. Digits toggle the matching option.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionListInput;

impl OptionListInput {
    fn selected(ctx: &FieldContext<'_>) -> Vec<Value> {
        match ctx.value {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

impl FieldRenderer for OptionListInput {
    fn display_value(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> String {
        let selected = Self::selected(ctx);
        ctx.schema
            .options
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                let mark = if selected
                    .iter()
                    .any(|item| option_matches(&option.value, item))
                {
                    &palette.choices.checked
                } else {
                    &palette.choices.unchecked
                };
                format!("{}{mark} {}", idx + 1, option.label)
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        _palette: &RenderPalette,
    ) -> Option<Value> {
        let KeyCode::Char(digit) = key.code else {
            return None;
        };
        let position = digit.to_digit(10)?.checked_sub(1)? as usize;
        let option = ctx.schema.options.get(position)?;
        let mut selected = Self::selected(ctx);
        if let Some(idx) = selected
            .iter()
            .position(|item| option_matches(&option.value, item))
        {
            selected.remove(idx);
        } else {
            // keep option order regardless of toggle order
            selected.push(option.value.clone());
            selected.sort_by_key(|item| {
                ctx.schema
                    .options
                    .iter()
                    .position(|candidate| option_matches(&candidate.value, item))
                    .unwrap_or(usize::MAX)
            });
        }
        Some(Value::Array(selected))
    }
}

/// Boolean toggle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxInput;

impl FieldRenderer for CheckboxInput {
    fn display_value(&self, ctx: &FieldContext<'_>, palette: &RenderPalette) -> String {
        let checked = ctx.value.and_then(Value::as_bool).unwrap_or(false);
        let choices = &palette.choices;
        if checked {
            format!("{} {}", choices.checked, choices.true_label)
        } else {
            format!("{} {}", choices.unchecked, choices.false_label)
        }
    }

    fn handle_key(
        &self,
        ctx: &FieldContext<'_>,
        key: &KeyEvent,
        _palette: &RenderPalette,
    ) -> Option<Value> {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                let checked = ctx.value.and_then(Value::as_bool).unwrap_or(false);
                Some(Value::Bool(!checked))
            }
            _ => None,
        }
    }
}

/// Read-only summary of an object-valued field. Its children are edited
/// through their own dotted fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSummary;

impl FieldRenderer for ObjectSummary {
    fn display_value(&self, ctx: &FieldContext<'_>, _palette: &RenderPalette) -> String {
        match ctx.value {
            Some(Value::Object(map)) if map.is_empty() => String::new(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| format!("{key}: {}", value_to_string(value)))
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{FieldOption, FieldSchema};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx<'a>(schema: &'a FieldSchema, value: Option<&'a Value>) -> FieldContext<'a> {
        FieldContext {
            schema,
            value,
            error: None,
            disabled: false,
            focused: true,
            width: 60,
        }
    }

    #[test]
    fn text_input_appends_and_deletes() {
        let schema = FieldSchema::new("name", "Name", FieldType::Text);
        let palette = RenderPalette::default();
        let value = json!("Ab");
        let next = TextInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('c')), &palette);
        assert_eq!(next, Some(json!("Abc")));
        let next = TextInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Backspace), &palette);
        assert_eq!(next, Some(json!("A")));
        let ctrl = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(TextInput.handle_key(&ctx(&schema, Some(&value)), &ctrl, &palette), None);
        assert_eq!(
            TextInput.handle_key(&ctx(&schema, None), &key(KeyCode::Backspace), &palette),
            None
        );
    }

    #[test]
    fn textarea_accepts_newlines() {
        let schema = FieldSchema::new("notes", "Notes", FieldType::Textarea);
        let palette = RenderPalette::default();
        let value = json!("line");
        let next = TextInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Enter), &palette);
        assert_eq!(next, Some(json!("line\n")));
        let plain = FieldSchema::new("name", "Name", FieldType::Text);
        assert_eq!(
            TextInput.handle_key(&ctx(&plain, Some(&value)), &key(KeyCode::Enter), &palette),
            None
        );
    }

    #[test]
    fn password_is_masked() {
        let schema = FieldSchema::new("secret", "Secret", FieldType::Password);
        let value = json!("hunter2");
        assert_eq!(
            PasswordInput.display_value(&ctx(&schema, Some(&value)), &RenderPalette::default()),
            "•••••••"
        );
    }

    #[test]
    fn number_input_keeps_partial_text() {
        let schema = FieldSchema::new("price", "Price", FieldType::Number);
        let palette = RenderPalette::default();
        let value = json!(12);
        let next = NumberInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('.')), &palette);
        assert_eq!(next, Some(json!("12.")));
        let partial = json!("12.");
        let next = NumberInput.handle_key(&ctx(&schema, Some(&partial)), &key(KeyCode::Char('5')), &palette);
        assert_eq!(next, Some(json!(12.5)));
        let next = NumberInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('x')), &palette);
        assert_eq!(next, Some(json!("12x")));
    }

    #[test]
    fn number_input_steps_with_arrows() {
        let schema = FieldSchema::new("sortOrder", "Sort order", FieldType::Number);
        let palette = RenderPalette::default();
        let value = json!(3);
        assert_eq!(
            NumberInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Right), &palette),
            Some(json!(4))
        );
        assert_eq!(
            NumberInput.handle_key(&ctx(&schema, None), &key(KeyCode::Left), &palette),
            Some(json!(-1))
        );
    }

    #[test]
    fn number_hints_add_affixes() {
        let palette = RenderPalette::default();
        let value = json!(499);
        let price = FieldSchema::new("price", "Price", FieldType::Number)
            .hint(DisplayHint::CurrencyPrefix);
        assert_eq!(NumberInput.display_value(&ctx(&price, Some(&value)), &palette), "₹ 499");
        let rate = json!(18);
        let tax = FieldSchema::new("tax", "Tax", FieldType::Number).hint(DisplayHint::PercentSuffix);
        assert_eq!(NumberInput.display_value(&ctx(&tax, Some(&rate)), &palette), "18 %");
        let blank = json!("");
        assert_eq!(NumberInput.display_value(&ctx(&tax, Some(&blank)), &palette), "");
    }

    fn tiers() -> FieldSchema {
        FieldSchema::new("tier", "Tier", FieldType::Select).options([
            FieldOption::new("basic", "Basic"),
            FieldOption::new("pro", "Pro"),
            FieldOption::new("enterprise", "Enterprise"),
        ])
    }

    #[test]
    fn select_cycles_through_options() {
        let schema = tiers();
        let palette = RenderPalette::default();
        assert_eq!(
            SelectInput.handle_key(&ctx(&schema, None), &key(KeyCode::Right), &palette),
            Some(json!("basic"))
        );
        let last = json!("enterprise");
        assert_eq!(
            SelectInput.handle_key(&ctx(&schema, Some(&last)), &key(KeyCode::Right), &palette),
            Some(json!("basic"))
        );
        let first = json!("basic");
        assert_eq!(
            SelectInput.handle_key(&ctx(&schema, Some(&first)), &key(KeyCode::Left), &palette),
            Some(json!("enterprise"))
        );
        assert_eq!(SelectInput.display_value(&ctx(&schema, Some(&first)), &palette), "Basic");
        assert_eq!(SelectInput.display_value(&ctx(&schema, None), &palette), "<none>");
    }

    #[test]
    fn option_list_toggles_by_digit() {
        let schema = FieldSchema::new("features", "Features", FieldType::CheckboxGroup).options([
            FieldOption::new("qr", "QR menu"),
            FieldOption::new("offers", "Offers"),
        ]);
        let palette = RenderPalette::default();
        let value = json!(["offers"]);
        let next = OptionListInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('1')), &palette);
        assert_eq!(next, Some(json!(["qr", "offers"])));
        let next = OptionListInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('2')), &palette);
        assert_eq!(next, Some(json!([])));
        assert_eq!(
            OptionListInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('9')), &palette),
            None
        );
        assert_eq!(
            OptionListInput.display_value(&ctx(&schema, Some(&value)), &palette),
            "1[ ] QR menu  2[x] Offers"
        );
    }

    #[test]
    fn option_list_matches_numeric_options_by_string_form() {
        let schema = FieldSchema::new("seats", "Seats", FieldType::MultiSelect)
            .options([FieldOption::new(5, "Five"), FieldOption::new(10, "Ten")]);
        let palette = RenderPalette::default();
        let value = json!(["5"]);
        assert_eq!(
            OptionListInput.display_value(&ctx(&schema, Some(&value)), &palette),
            "1[x] Five  2[ ] Ten"
        );
        let next = OptionListInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('1')), &palette);
        assert_eq!(next, Some(json!([])));
        let next = OptionListInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('2')), &palette);
        assert_eq!(next, Some(json!(["5", 10])));
    }

    #[test]
    fn select_cycles_from_string_form_of_numeric_option() {
        let schema = FieldSchema::new("seats", "Seats", FieldType::Select)
            .options([FieldOption::new(5, "Five"), FieldOption::new(10, "Ten")]);
        let palette = RenderPalette::default();
        let value = json!("5");
        let next = SelectInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Right), &palette);
        assert_eq!(next, Some(json!(10)));
    }

    #[test]
    fn checkbox_toggles() {
        let schema = FieldSchema::new("active", "Active", FieldType::Checkbox);
        let palette = RenderPalette::default();
        let value = json!(true);
        assert_eq!(
            CheckboxInput.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char(' ')), &palette),
            Some(json!(false))
        );
        assert_eq!(
            CheckboxInput.display_value(&ctx(&schema, Some(&value)), &palette),
            "[x] Yes"
        );
    }

    #[test]
    fn object_summary_is_read_only() {
        let schema = FieldSchema::new("limits", "Limits", FieldType::Object);
        let palette = RenderPalette::default();
        let value = json!({"maxCaptains": 4, "maxTables": 20});
        assert_eq!(
            ObjectSummary.display_value(&ctx(&schema, Some(&value)), &palette),
            "maxCaptains: 4, maxTables: 20"
        );
        assert_eq!(
            ObjectSummary.handle_key(&ctx(&schema, Some(&value)), &key(KeyCode::Char('a')), &palette),
            None
        );
    }
}
