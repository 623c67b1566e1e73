//! Correction form staged after a rejected line.
//!
//! The form has one field per argument and option visible at the resolved
//! command, prefilled from what the user typed. Options whose prerequisites
//! are not satisfied by other filled-in fields are disabled and cleared.
//! [`CorrectionForm::compose_line`] turns the fields back into a command
//! line for resubmission.

use std::fmt::Write as _;

use crate::core::parser::ParsedLine;
use crate::core::resolver::Scope;
use crate::models::{AllowedValues, ArgumentSpec, OptionSpec, Value, ValueType};

/// Validity of a field's current text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    Empty,
    Valid,
    Invalid,
}

/// Position of a field within the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRef {
    Argument(usize),
    Option(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    /// Spec name.
    pub name: String,
    pub value_type: ValueType,
    pub allowed: Option<AllowedValues>,
    pub required: bool,
    /// Help, prerequisites, allowed values and type, one per line.
    pub information: String,
    /// Keys the field may be submitted under (name, then aliases).
    pub keys: Vec<String>,
    /// Key used when composing the line.
    pub key: String,
    pub prerequisites: Vec<Vec<String>>,
    pub value: String,
    pub enabled: bool,
}

impl FormField {
    fn argument(spec: &ArgumentSpec) -> Self {
        Self {
            name: spec.name.clone(),
            value_type: spec.value_type,
            allowed: spec.allowed.clone(),
            required: true,
            information: spec.information(),
            keys: vec![spec.name.clone()],
            key: spec.name.clone(),
            prerequisites: Vec::new(),
            value: String::new(),
            enabled: true,
        }
    }

    fn option(spec: &OptionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            value_type: spec.value_type,
            allowed: spec.allowed.clone(),
            required: spec.required,
            information: spec.information(),
            keys: spec.keys().map(str::to_string).collect(),
            key: spec.name.clone(),
            prerequisites: spec.prerequisites.clone(),
            value: String::new(),
            enabled: true,
        }
    }

    pub fn state(&self) -> FieldState {
        if self.value.trim().is_empty() {
            FieldState::Empty
        } else if self.value_type.coerce(&self.value, self.allowed.as_ref()).is_some() {
            FieldState::Valid
        } else {
            FieldState::Invalid
        }
    }

    fn needs_attention(&self) -> bool {
        match self.state() {
            FieldState::Invalid => true,
            FieldState::Empty => self.required,
            FieldState::Valid => false,
        }
    }
}

/// Literal that spells `value` for a boolean field.
fn boolean_literal(allowed: Option<&AllowedValues>, value: bool) -> String {
    let group = usize::from(value);
    match allowed {
        Some(AllowedValues::Literals(groups)) => groups
            .get(group)
            .and_then(|literals| literals.first())
            .cloned()
            .unwrap_or_else(|| value.to_string()),
        _ => value.to_string(),
    }
}

/// A value holding both quote characters has no quoted spelling.
fn quotable(value: &str) -> bool {
    !(value.contains('"') && value.contains('\''))
}

fn quote(value: &str) -> String {
    if value.contains('"') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value)
    }
}

// =============================================================================
// Correction Form
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct CorrectionForm {
    command: Vec<String>,
    arguments: Vec<FormField>,
    options: Vec<FormField>,
}

impl CorrectionForm {
    /// Build a form for `command` prefilled from `parsed`.
    pub fn new(command: Vec<String>, scope: &Scope<'_>, parsed: &ParsedLine) -> Self {
        let arguments = scope
            .arguments
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let mut field = FormField::argument(spec);
                if let Some(raw) = parsed.arguments.get(i) {
                    field.value = raw.clone();
                }
                field
            })
            .collect();

        let options = scope
            .options
            .iter()
            .map(|spec| {
                let mut field = FormField::option(spec);
                if let Some(raw) = parsed.options.iter().find(|raw| spec.matches(&raw.name)) {
                    field.key = raw.name.clone();
                    field.value = match &raw.value {
                        Some(value) => value.clone(),
                        None if spec.value_type == ValueType::Boolean => {
                            let default = spec.default.as_ref().and_then(Value::as_bool);
                            boolean_literal(spec.allowed.as_ref(), !default.unwrap_or(false))
                        }
                        None => String::new(),
                    };
                }
                field
            })
            .collect();

        let mut form = Self {
            command,
            arguments,
            options,
        };
        form.refresh();
        form
    }

    /// Command words the form resubmits.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn arguments(&self) -> &[FormField] {
        &self.arguments
    }

    pub fn options(&self) -> &[FormField] {
        &self.options
    }

    pub fn field(&self, field: FieldRef) -> Option<&FormField> {
        match field {
            FieldRef::Argument(i) => self.arguments.get(i),
            FieldRef::Option(i) => self.options.get(i),
        }
    }

    /// Set a field's text. Disabled or unknown fields are left alone, as
    /// are values mixing `'` and `"`, which cannot be quoted on a line.
    pub fn set(&mut self, field: FieldRef, value: impl Into<String>) -> bool {
        let value = value.into();
        if !quotable(&value) {
            return false;
        }
        let slot = match field {
            FieldRef::Argument(i) => self.arguments.get_mut(i),
            FieldRef::Option(i) => self.options.get_mut(i),
        };
        match slot {
            Some(slot) if slot.enabled => {
                slot.value = value;
                self.refresh();
                true
            }
            _ => false,
        }
    }

    /// Submit option `index` under `key`, which must be its name or an alias.
    pub fn select_key(&mut self, index: usize, key: &str) -> bool {
        match self.options.get_mut(index) {
            Some(field) if field.keys.iter().any(|k| k == key) => {
                field.key = key.to_string();
                self.refresh();
                true
            }
            _ => false,
        }
    }

    /// First field still needing input: options before arguments.
    pub fn next_incomplete(&self) -> Option<FieldRef> {
        self.options
            .iter()
            .position(|field| field.enabled && field.needs_attention())
            .map(FieldRef::Option)
            .or_else(|| {
                self.arguments
                    .iter()
                    .position(|field| field.state() != FieldState::Valid)
                    .map(FieldRef::Argument)
            })
    }

    pub fn is_ready(&self) -> bool {
        self.next_incomplete().is_none()
    }

    /// Render the form as `words "arg" --key="value"`.
    ///
    /// Empty fields and disabled options are left out.
    pub fn compose_line(&self) -> String {
        let mut line = self.command.join(" ");
        for field in &self.arguments {
            if !field.value.is_empty() {
                let _ = write!(line, " {}", quote(&field.value));
            }
        }
        for field in &self.options {
            if field.enabled && !field.value.is_empty() {
                let _ = write!(line, " --{}={}", field.key, quote(&field.value));
            }
        }
        line.trim_start().to_string()
    }

    /// Re-evaluate option prerequisites until stable.
    ///
    /// A group is satisfied by another option whose selected key is in the
    /// group and whose value is present and not invalid.
    fn refresh(&mut self) {
        loop {
            let mut changed = false;
            for i in 0..self.options.len() {
                let enabled = self.options[i].prerequisites.iter().all(|group| {
                    self.options.iter().enumerate().any(|(k, other)| {
                        k != i
                            && group.contains(&other.key)
                            && other.state() == FieldState::Valid
                    })
                });
                let field = &mut self.options[i];
                if field.enabled != enabled {
                    field.enabled = enabled;
                    changed = true;
                }
                if !enabled && !field.value.is_empty() {
                    field.value.clear();
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }
}
