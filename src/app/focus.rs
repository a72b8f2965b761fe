use crate::domain::{FieldSchema, FormDefinition};

/// Which field has keyboard focus: a section index and a field index inside
/// it. Moving past the last field of a section continues in the next
/// non-empty section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusCursor {
    pub section: usize,
    pub field: usize,
}

impl FocusCursor {
    /// First focusable field of the form.
    pub fn first(definition: &FormDefinition) -> Self {
        let section = definition
            .sections
            .iter()
            .position(|section| !section.fields.is_empty())
            .unwrap_or(0);
        Self { section, field: 0 }
    }

    pub fn field<'a>(&self, definition: &'a FormDefinition) -> Option<&'a FieldSchema> {
        definition
            .sections
            .get(self.section)
            .and_then(|section| section.fields.get(self.field))
    }

    pub fn next_field(&mut self, definition: &FormDefinition) {
        let len = section_len(definition, self.section);
        if self.field + 1 < len {
            self.field += 1;
        } else {
            self.step_section(definition, 1);
        }
    }

    pub fn prev_field(&mut self, definition: &FormDefinition) {
        if self.field > 0 {
            self.field -= 1;
        } else {
            self.step_section(definition, -1);
            self.field = section_len(definition, self.section).saturating_sub(1);
        }
    }

    pub fn next_section(&mut self, definition: &FormDefinition) {
        self.step_section(definition, 1);
    }

    pub fn prev_section(&mut self, definition: &FormDefinition) {
        self.step_section(definition, -1);
    }

    /// Jump to the field called `name`. Returns false when no such field
    /// exists.
    pub fn focus_name(&mut self, definition: &FormDefinition, name: &str) -> bool {
        for (section_idx, section) in definition.sections.iter().enumerate() {
            if let Some(field_idx) = section.fields.iter().position(|field| field.name == name) {
                self.section = section_idx;
                self.field = field_idx;
                return true;
            }
        }
        false
    }

    /// Move to the next (or previous) section with at least one field,
    /// wrapping around. Lands on its first field.
    fn step_section(&mut self, definition: &FormDefinition, delta: isize) {
        let total = definition.sections.len();
        if total == 0 {
            return;
        }
        let mut index = self.section;
        for _ in 0..total {
            index = (index as isize + delta).rem_euclid(total as isize) as usize;
            if section_len(definition, index) > 0 {
                self.section = index;
                self.field = 0;
                return;
            }
        }
    }
}

fn section_len(definition: &FormDefinition, index: usize) -> usize {
    definition
        .sections
        .get(index)
        .map_or(0, |section| section.fields.len())
}
