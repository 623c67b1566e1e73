//! Argument and option schemas.
//!
//! A [`ValueType`] carries the coercion rules for its values: how a raw token
//! is parsed, how it is checked against an [`AllowedValues`] constraint, and
//! which constraint applies when none is declared.

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use crate::config::{BOOLEAN_FALSE_LITERALS, BOOLEAN_TRUE_LITERALS, FIELD_SEPARATOR};
use crate::core::error::{SchemaError, render_groups};

use super::Value;

// =============================================================================
// Value Types
// =============================================================================

/// Type tag of an argument or option value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ValueType {
    /// Short name shown to users.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Constraint used when a spec of this type declares none.
    pub fn default_allowed(self) -> Option<AllowedValues> {
        match self {
            Self::Boolean => Some(AllowedValues::literals([
                BOOLEAN_FALSE_LITERALS,
                BOOLEAN_TRUE_LITERALS,
            ])),
            _ => None,
        }
    }

    /// Coerce a raw token into a typed value.
    ///
    /// Returns `None` when the token does not parse or falls outside `allowed`.
    pub fn coerce(self, raw: &str, allowed: Option<&AllowedValues>) -> Option<Value> {
        match self {
            Self::Boolean => {
                let default = Self::Boolean.default_allowed();
                let allowed = allowed.or(default.as_ref())?;
                if !allowed.admits_literal(raw) {
                    return None;
                }
                Some(Value::Boolean(!allowed.is_false_literal(raw)))
            }
            Self::Integer => {
                // Integers go through a float parse, so "1e3" is accepted but "1.0" is not.
                if raw.contains('.') {
                    return None;
                }
                let parsed = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
                let value = parsed.trunc() as i64;
                admits_number(allowed, value as f64).then_some(Value::Integer(value))
            }
            Self::Float => {
                let value = raw.trim().parse::<f64>().ok()?;
                admits_number(allowed, value).then_some(Value::Float(value))
            }
            Self::String => match allowed {
                Some(allowed) if !allowed.admits_literal(raw) => None,
                _ => Some(Value::String(raw.to_string())),
            },
        }
    }
}

fn admits_number(allowed: Option<&AllowedValues>, value: f64) -> bool {
    allowed.is_none_or(|allowed| allowed.admits_number(value))
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Allowed Values
// =============================================================================

/// Constraint on the values a spec accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedValues {
    /// Inclusive numeric ranges; a value is valid inside any of them.
    Ranges(Vec<RangeInclusive<f64>>),
    /// Groups of literal tokens, stored lower-cased.
    ///
    /// For booleans the first group holds the `false` spellings.
    Literals(Vec<Vec<String>>),
}

impl AllowedValues {
    pub fn ranges(ranges: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::Ranges(ranges.into_iter().map(|(min, max)| min..=max).collect())
    }

    pub fn literals<G, S>(groups: impl IntoIterator<Item = G>) -> Self
    where
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Literals(
            groups
                .into_iter()
                .map(|group| {
                    group
                        .into_iter()
                        .map(|literal| literal.as_ref().to_lowercase())
                        .collect()
                })
                .collect(),
        )
    }

    pub fn admits_number(&self, value: f64) -> bool {
        match self {
            Self::Ranges(ranges) => ranges.iter().any(|range| range.contains(&value)),
            Self::Literals(_) => false,
        }
    }

    /// Case-insensitive membership in any literal group.
    pub fn admits_literal(&self, raw: &str) -> bool {
        match self {
            Self::Literals(groups) => {
                let lower = raw.to_lowercase();
                groups.iter().flatten().any(|literal| *literal == lower)
            }
            Self::Ranges(_) => false,
        }
    }

    /// True when `raw` belongs to the first literal group.
    pub fn is_false_literal(&self, raw: &str) -> bool {
        match self {
            Self::Literals(groups) => {
                let lower = raw.to_lowercase();
                groups
                    .first()
                    .is_some_and(|group| group.iter().any(|literal| *literal == lower))
            }
            Self::Ranges(_) => false,
        }
    }

    fn check(&self, spec: &str, value_type: ValueType) -> Result<(), SchemaError> {
        match self {
            Self::Ranges(ranges) => {
                if !value_type.is_numeric() {
                    return Err(SchemaError::RangesOnText {
                        spec: spec.to_string(),
                    });
                }
                if let Some(range) = ranges.iter().find(|range| range.start() > range.end()) {
                    return Err(SchemaError::InvertedRange {
                        spec: spec.to_string(),
                        min: *range.start(),
                        max: *range.end(),
                    });
                }
            }
            Self::Literals(groups) => {
                if value_type.is_numeric() {
                    return Err(SchemaError::LiteralsOnNumeric {
                        spec: spec.to_string(),
                        value_type,
                    });
                }
                if value_type == ValueType::Boolean && groups.len() != 2 {
                    return Err(SchemaError::BooleanGroups {
                        spec: spec.to_string(),
                        groups: groups.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for AllowedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = match self {
            Self::Ranges(ranges) => ranges
                .iter()
                .map(|range| format!("({}, {})", range.start(), range.end()))
                .collect(),
            Self::Literals(groups) => groups
                .iter()
                .map(|group| format!("({})", group.join(", ")))
                .collect(),
        };
        f.write_str(&rendered.join(", "))
    }
}

/// Rewrite a spec name into its prepared-parameter key.
pub fn field_key(name: &str) -> String {
    name.chars()
        .map(|c| if c == '-' { FIELD_SEPARATOR } else { c })
        .collect()
}

fn check_name(name: &str) -> Result<(), SchemaError> {
    if name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }
    Ok(())
}

// =============================================================================
// Argument Spec
// =============================================================================

/// Positional argument declared on a command.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentSpec {
    pub name: String,
    pub value_type: ValueType,
    pub allowed: Option<AllowedValues>,
    pub help: Option<String>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into().trim().to_string(),
            value_type,
            allowed: value_type.default_allowed(),
            help: None,
        }
    }

    pub fn with_allowed(mut self, allowed: AllowedValues) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn key(&self) -> String {
        field_key(&self.name)
    }

    pub fn coerce(&self, raw: &str) -> Option<Value> {
        self.value_type.coerce(raw, self.allowed.as_ref())
    }

    /// Multi-line summary: help text, allowed values, type.
    pub fn information(&self) -> String {
        let mut info = String::new();
        if let Some(help) = &self.help {
            info.push_str(help);
            info.push('\n');
        }
        if let Some(allowed) = &self.allowed {
            info.push_str(&format!("allowed values: {}\n", allowed));
        }
        info.push_str(&format!("type: {}", self.value_type));
        info
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        check_name(&self.name)?;
        if let Some(allowed) = &self.allowed {
            allowed.check(&self.name, self.value_type)?;
        }
        Ok(())
    }
}

// =============================================================================
// Option Spec
// =============================================================================

/// Named `--option` declared on a command.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionSpec {
    pub name: String,
    pub value_type: ValueType,
    pub aliases: Vec<String>,
    pub allowed: Option<AllowedValues>,
    pub default: Option<Value>,
    /// OR-groups of option names; every group needs one supplied member.
    pub prerequisites: Vec<Vec<String>>,
    pub required: bool,
    pub help: Option<String>,
}

impl OptionSpec {
    /// New option; required unless it is boolean.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into().trim().to_string(),
            value_type,
            aliases: Vec::new(),
            allowed: value_type.default_allowed(),
            default: None,
            prerequisites: Vec::new(),
            required: value_type != ValueType::Boolean,
            help: None,
        }
    }

    /// Boolean options ignore this and stay optional.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required && self.value_type != ValueType::Boolean;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().trim().to_string());
        self
    }

    pub fn with_allowed(mut self, allowed: AllowedValues) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Add one OR-group of prerequisite option names.
    pub fn with_prerequisite<S: Into<String>>(mut self, group: impl IntoIterator<Item = S>) -> Self {
        self.prerequisites
            .push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// True when `key` is the option's name or one of its aliases.
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.iter().any(|alias| alias == key)
    }

    /// Name followed by aliases.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Prerequisite groups with no member among `supplied`.
    pub fn unmet_prerequisites(&self, supplied: &HashSet<&str>) -> Vec<Vec<String>> {
        self.prerequisites
            .iter()
            .filter(|group| !group.iter().any(|name| supplied.contains(name.as_str())))
            .cloned()
            .collect()
    }

    pub fn prerequisites_met(&self, supplied: &HashSet<&str>) -> bool {
        self.prerequisites
            .iter()
            .all(|group| group.iter().any(|name| supplied.contains(name.as_str())))
    }

    pub fn coerce(&self, raw: &str) -> Option<Value> {
        self.value_type.coerce(raw, self.allowed.as_ref())
    }

    /// Multi-line summary: help text, prerequisites, allowed values, type.
    pub fn information(&self) -> String {
        let mut info = String::new();
        if let Some(help) = &self.help {
            info.push_str(help);
            info.push('\n');
        }
        if !self.prerequisites.is_empty() {
            info.push_str(&format!(
                "prerequisites: {}\n",
                render_groups(&self.prerequisites)
            ));
        }
        if let Some(allowed) = &self.allowed {
            info.push_str(&format!("allowed values: {}\n", allowed));
        }
        info.push_str(&format!("type: {}", self.value_type));
        info
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        check_name(&self.name)?;
        for alias in &self.aliases {
            check_name(alias)?;
        }
        if let Some(allowed) = &self.allowed {
            allowed.check(&self.name, self.value_type)?;
        }
        if let Some(default) = &self.default
            && default.value_type() != Some(self.value_type)
        {
            return Err(SchemaError::DefaultType {
                spec: self.name.clone(),
                expected: self.value_type,
            });
        }
        if self.prerequisites.iter().any(Vec::is_empty) {
            return Err(SchemaError::EmptyPrerequisiteGroup {
                spec: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_union() {
        let allowed = AllowedValues::ranges([(0.0, 10.0), (20.0, 30.0)]);
        assert_eq!(
            ValueType::Integer.coerce("5", Some(&allowed)),
            Some(Value::Integer(5))
        );
        assert_eq!(
            ValueType::Integer.coerce("25", Some(&allowed)),
            Some(Value::Integer(25))
        );
        assert_eq!(ValueType::Integer.coerce("15", Some(&allowed)), None);
        assert_eq!(
            ValueType::Float.coerce("10", Some(&allowed)),
            Some(Value::Float(10.0))
        );
        assert_eq!(ValueType::Float.coerce("10.5", Some(&allowed)), None);
    }

    #[test]
    fn test_integer_rejects_decimal_point() {
        assert_eq!(ValueType::Integer.coerce("3.0", None), None);
        assert_eq!(ValueType::Integer.coerce("1e3", None), Some(Value::Integer(1000)));
        assert_eq!(ValueType::Integer.coerce("-7", None), Some(Value::Integer(-7)));
        assert_eq!(ValueType::Integer.coerce("seven", None), None);
    }

    #[test]
    fn test_boolean_default_literals() {
        assert_eq!(ValueType::Boolean.coerce("TRUE", None), Some(Value::Boolean(true)));
        assert_eq!(ValueType::Boolean.coerce("0", None), Some(Value::Boolean(false)));
        assert_eq!(ValueType::Boolean.coerce("False", None), Some(Value::Boolean(false)));
        assert_eq!(ValueType::Boolean.coerce("yes", None), None);
    }

    #[test]
    fn test_boolean_custom_literals() {
        let allowed = AllowedValues::literals([["off", "no"], ["on", "yes"]]);
        assert_eq!(
            ValueType::Boolean.coerce("YES", Some(&allowed)),
            Some(Value::Boolean(true))
        );
        assert_eq!(
            ValueType::Boolean.coerce("no", Some(&allowed)),
            Some(Value::Boolean(false))
        );
        assert_eq!(ValueType::Boolean.coerce("true", Some(&allowed)), None);
    }

    #[test]
    fn test_string_literals_case_insensitive() {
        let allowed = AllowedValues::literals([["LIGHT", "DARK", "SYSTEM"]]);
        assert_eq!(
            ValueType::String.coerce("Dark", Some(&allowed)),
            Some(Value::String("Dark".to_string()))
        );
        assert_eq!(ValueType::String.coerce("blue", Some(&allowed)), None);
        assert_eq!(
            ValueType::String.coerce("anything", None),
            Some(Value::String("anything".to_string()))
        );
    }

    #[test]
    fn test_boolean_option_never_required() {
        let spec = OptionSpec::new("on", ValueType::Boolean).with_required(true);
        assert!(!spec.required);
        assert!(OptionSpec::new("x", ValueType::Float).required);
        assert!(!OptionSpec::new("x", ValueType::Float).optional().required);
    }

    #[test]
    fn test_prerequisite_groups() {
        let spec = OptionSpec::new("d", ValueType::String)
            .with_prerequisite(["a", "b"])
            .with_prerequisite(["c"]);

        let supplied: HashSet<&str> = ["a", "c"].into_iter().collect();
        assert!(spec.prerequisites_met(&supplied));

        let supplied: HashSet<&str> = ["b"].into_iter().collect();
        assert!(!spec.prerequisites_met(&supplied));
        assert_eq!(spec.unmet_prerequisites(&supplied), vec![vec!["c".to_string()]]);

        let supplied: HashSet<&str> = ["c"].into_iter().collect();
        assert!(!spec.prerequisites_met(&supplied));
    }

    #[test]
    fn test_schema_checks() {
        assert!(matches!(
            ArgumentSpec::new("n", ValueType::Integer)
                .with_allowed(AllowedValues::literals([["a"]]))
                .check(),
            Err(SchemaError::LiteralsOnNumeric { .. })
        ));
        assert!(matches!(
            OptionSpec::new("n", ValueType::Float)
                .with_allowed(AllowedValues::ranges([(5.0, 1.0)]))
                .check(),
            Err(SchemaError::InvertedRange { .. })
        ));
        assert!(matches!(
            OptionSpec::new("n", ValueType::Boolean)
                .with_allowed(AllowedValues::literals([["x", "y", "z"]]))
                .check(),
            Err(SchemaError::BooleanGroups { groups: 1, .. })
        ));
        assert!(matches!(
            OptionSpec::new("n", ValueType::Boolean)
                .with_default(Value::Integer(1))
                .check(),
            Err(SchemaError::DefaultType { .. })
        ));
        assert!(matches!(
            ArgumentSpec::new("  ", ValueType::String).check(),
            Err(SchemaError::EmptyName)
        ));
        assert!(OptionSpec::new("ok", ValueType::Boolean).check().is_ok());
    }

    #[test]
    fn test_information() {
        let spec = OptionSpec::new("thickness", ValueType::Float)
            .with_help("thickness (um)")
            .with_prerequisite(["resistivity", "conductivity"]);
        assert_eq!(
            spec.information(),
            "thickness (um)\nprerequisites: (--resistivity, --conductivity)\ntype: float"
        );

        let arg = ArgumentSpec::new("flag", ValueType::Boolean);
        assert_eq!(arg.information(), "allowed values: (0, false), (1, true)\ntype: bool");
    }

    #[test]
    fn test_field_key() {
        assert_eq!(field_key("base-metal"), "base_metal");
        assert_eq!(ArgumentSpec::new("new-name", ValueType::String).key(), "new_name");
    }
}
