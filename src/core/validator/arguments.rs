//! Positional argument validation.

use crate::core::error::{InvalidField, ValidationError};
use crate::models::{ArgumentSpec, Prepared};

/// Match `supplied` literals to `specs` by position.
///
/// Every literal that coerces is written to `prepared` under its spec's
/// key, even when another argument fails. Failures are reported as
/// missing, then overflow, then invalid.
pub fn validate_arguments(
    specs: &[&ArgumentSpec],
    supplied: &[String],
    prepared: &mut Prepared,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = specs
        .iter()
        .skip(supplied.len())
        .map(|spec| spec.name.clone())
        .collect();
    let overflow: Vec<String> = supplied.iter().skip(specs.len()).cloned().collect();

    let mut invalid = Vec::new();
    for (spec, raw) in specs.iter().zip(supplied) {
        match spec.coerce(raw) {
            Some(value) => prepared.insert(&spec.name, value),
            None => invalid.push(InvalidField {
                name: spec.name.clone(),
                value: Some(raw.clone()),
                expected: spec.value_type,
                allowed: spec.allowed.clone(),
            }),
        }
    }

    if !missing.is_empty() {
        Err(ValidationError::MissingArgument { names: missing })
    } else if !overflow.is_empty() {
        Err(ValidationError::OverflowArgument { values: overflow })
    } else if !invalid.is_empty() {
        Err(ValidationError::InvalidArgumentValue { fields: invalid })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllowedValues, Value, ValueType};
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_all_valid() {
        let path = ArgumentSpec::new("path", ValueType::String);
        let count = ArgumentSpec::new("count", ValueType::Integer);
        let mut prepared = Prepared::new();

        let result = validate_arguments(&[&path, &count], &strings(&["/tmp", "3"]), &mut prepared);

        assert_eq!(result, Ok(()));
        assert_eq!(prepared.str("path"), Some("/tmp"));
        assert_eq!(prepared.get("count"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_missing_wins_over_invalid() {
        let a = ArgumentSpec::new("a", ValueType::Integer);
        let b = ArgumentSpec::new("b", ValueType::Integer);
        let mut prepared = Prepared::new();

        let result = validate_arguments(&[&a, &b], &strings(&["x"]), &mut prepared);

        assert_eq!(
            result,
            Err(ValidationError::MissingArgument {
                names: strings(&["b"])
            })
        );
        assert!(prepared.is_empty());
    }

    #[test]
    fn test_overflow() {
        let a = ArgumentSpec::new("a", ValueType::String);
        let mut prepared = Prepared::new();

        let result = validate_arguments(&[&a], &strings(&["1", "2", "3"]), &mut prepared);

        assert_eq!(
            result,
            Err(ValidationError::OverflowArgument {
                values: strings(&["2", "3"])
            })
        );
        // The matched literal is still prepared.
        assert_eq!(prepared.str("a"), Some("1"));
    }

    #[test]
    fn test_invalid_keeps_valid_siblings() {
        let mode = ArgumentSpec::new("mode", ValueType::String)
            .with_allowed(AllowedValues::literals([["fast", "slow"]]));
        let new_name = ArgumentSpec::new("new-name", ValueType::String);
        let mut prepared = Prepared::new();

        let result =
            validate_arguments(&[&mode, &new_name], &strings(&["warp", "x"]), &mut prepared);

        assert_eq!(
            result,
            Err(ValidationError::InvalidArgumentValue {
                fields: vec![InvalidField {
                    name: "mode".to_string(),
                    value: Some("warp".to_string()),
                    expected: ValueType::String,
                    allowed: Some(AllowedValues::literals([["fast", "slow"]])),
                }]
            })
        );
        assert_eq!(prepared.str("new_name"), Some("x"));
        assert!(!prepared.contains("mode"));
    }

    #[test]
    fn test_no_specs_no_input() {
        let mut prepared = Prepared::new();
        assert_eq!(validate_arguments(&[], &[], &mut prepared), Ok(()));
    }
}
