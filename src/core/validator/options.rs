//! `--option` validation.
//!
//! Each spec is matched against the supplied options by name or alias. The
//! first matching occurrence is staged in the prepared map under the key
//! the user typed; once it coerces, the staged entry is replaced by the
//! typed value under the spec's own name.

use std::collections::HashSet;

use crate::core::error::{InvalidField, MissingPrerequisite, ValidationError};
use crate::core::parser::RawOption;
use crate::models::{OptionSpec, Prepared, Value, ValueType};

/// Outcome of checking one supplied occurrence.
enum Check {
    Accepted(Value),
    /// Bare non-boolean optional option: staged, but nothing to coerce.
    Unset,
    Invalid,
}

fn check_required(spec: &OptionSpec, raw: &RawOption) -> Check {
    match raw.value.as_deref().map(|value| spec.coerce(value)) {
        Some(Some(value)) => Check::Accepted(value),
        // A bare required option counts as missing, not invalid.
        None => Check::Unset,
        Some(None) => Check::Invalid,
    }
}

fn check_optional(spec: &OptionSpec, raw: &RawOption) -> Check {
    match raw.value.as_deref() {
        Some(value) => spec.coerce(value).map_or(Check::Invalid, Check::Accepted),
        None if spec.value_type == ValueType::Boolean => {
            // A bare boolean flag toggles its default.
            let default = spec.default.as_ref().and_then(Value::as_bool).unwrap_or(false);
            Check::Accepted(Value::Boolean(!default))
        }
        None => Check::Unset,
    }
}

/// Validate `supplied` options against `specs`.
///
/// Errors are reported by priority: invalid value, missing required option,
/// unknown option, missing prerequisite.
pub fn validate_options(
    specs: &[&OptionSpec],
    supplied: &[RawOption],
    prepared: &mut Prepared,
) -> Result<(), ValidationError> {
    let supplied_names: HashSet<&str> = supplied
        .iter()
        .map(|raw| raw.name.as_str())
        .collect();

    let mut invalid = Vec::new();
    let mut missing_required = Vec::new();
    let mut missing_prerequisites = Vec::new();

    for spec in specs {
        let unmet = spec.unmet_prerequisites(&supplied_names);
        let mut satisfied = false;

        for raw in supplied.iter().filter(|raw| spec.matches(&raw.name)) {
            prepared.insert(&raw.name, Value::Raw(raw.value.clone()));

            if !unmet.is_empty() {
                missing_prerequisites.push(MissingPrerequisite {
                    option: raw.name.clone(),
                    unmet: unmet.clone(),
                });
                satisfied = true;
                continue;
            }

            let check = if spec.required {
                check_required(spec, raw)
            } else {
                check_optional(spec, raw)
            };
            match check {
                Check::Accepted(value) => {
                    prepared.remove(&raw.name);
                    prepared.insert(&spec.name, value);
                    satisfied = true;
                }
                Check::Invalid => invalid.push(InvalidField {
                    name: raw.name.clone(),
                    value: raw.value.clone(),
                    expected: spec.value_type,
                    allowed: spec.allowed.clone(),
                }),
                Check::Unset => {}
            }
            break;
        }

        // Unmet prerequisites take precedence over absence.
        if spec.required && !satisfied && unmet.is_empty() {
            missing_required.push(spec.name.clone());
        }
    }

    let non_existing: Vec<String> = supplied
        .iter()
        .filter(|raw| !specs.iter().any(|spec| spec.matches(&raw.name)))
        .map(|raw| raw.name.clone())
        .collect();

    if !invalid.is_empty() {
        Err(ValidationError::InvalidOptionValue { fields: invalid })
    } else if !missing_required.is_empty() {
        Err(ValidationError::MissingRequiredOption {
            names: missing_required,
        })
    } else if !non_existing.is_empty() {
        Err(ValidationError::NonExistingOption {
            names: non_existing,
        })
    } else if !missing_prerequisites.is_empty() {
        Err(ValidationError::MissingOptionPrerequisite {
            entries: missing_prerequisites,
        })
    } else {
        Ok(())
    }
}
