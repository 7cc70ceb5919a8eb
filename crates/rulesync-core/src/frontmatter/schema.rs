use std::fmt;

use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

use super::codec::{value_type_name, Frontmatter};
use crate::model::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    StringList,
    /// A list of `*` or tool identifiers.
    Targets,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::StringList => "list of strings",
            Self::Targets => "list of targets",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Declared fields of a frontmatter block. Keys not listed here are
/// carried through validation untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum ProblemKind {
    Missing,
    WrongType {
        expected: FieldType,
        found: &'static str,
    },
    InvalidValue {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldProblem {
    pub field: String,
    #[serde(flatten)]
    pub kind: ProblemKind,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ProblemKind::Missing => write!(f, "`{}` is required", self.field),
            ProblemKind::WrongType { expected, found } => {
                write!(f, "`{}` must be a {expected}, found {found}", self.field)
            }
            ProblemKind::InvalidValue { reason } => write!(f, "`{}`: {reason}", self.field),
        }
    }
}

/// Every field-level problem found in one frontmatter block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_problems(.problems))]
pub struct ValidationError {
    pub problems: Vec<FieldProblem>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.problems.iter().map(|p| p.field.as_str())
    }
}

fn join_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check `frontmatter` against this schema.
    ///
    /// Returns a normalized copy on success: a bare string given for a list
    /// field becomes a one-element list. All problems are collected before
    /// failing.
    pub fn validate(&self, frontmatter: &Frontmatter) -> Result<Frontmatter, ValidationError> {
        let mut normalized = frontmatter.clone();
        let mut problems = Vec::new();

        for spec in self.fields {
            let value = match frontmatter.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        problems.push(FieldProblem {
                            field: spec.name.to_string(),
                            kind: ProblemKind::Missing,
                        });
                    }
                    continue;
                }
                Some(value) => value,
            };

            match check_field(spec.ty, value) {
                Ok(Some(replacement)) => {
                    normalized.insert(Value::from(spec.name), replacement);
                }
                Ok(None) => {}
                Err(kind) => problems.push(FieldProblem {
                    field: spec.name.to_string(),
                    kind,
                }),
            }
        }

        if problems.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError { problems })
        }
    }
}

/// `Ok(Some(v))` means the value is valid once replaced by `v`.
fn check_field(ty: FieldType, value: &Value) -> Result<Option<Value>, ProblemKind> {
    let wrong_type = || ProblemKind::WrongType {
        expected: ty,
        found: value_type_name(value),
    };

    match ty {
        FieldType::String => value.is_string().then_some(None).ok_or_else(wrong_type),
        FieldType::Bool => value.is_bool().then_some(None).ok_or_else(wrong_type),
        FieldType::StringList | FieldType::Targets => {
            let (items, replacement) = match value {
                Value::String(s) => (
                    vec![value.clone()],
                    Some(Value::Sequence(vec![Value::from(s.as_str())])),
                ),
                Value::Sequence(seq) => (seq.clone(), None),
                _ => return Err(wrong_type()),
            };

            for (i, item) in items.iter().enumerate() {
                let Some(s) = item.as_str() else {
                    return Err(ProblemKind::InvalidValue {
                        reason: format!(
                            "item {i} must be a string, found {}",
                            value_type_name(item)
                        ),
                    });
                };
                if ty == FieldType::Targets && s.parse::<Target>().is_err() {
                    return Err(ProblemKind::InvalidValue {
                        reason: format!("unknown target '{s}'"),
                    });
                }
            }
            Ok(replacement)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse;

    const COMMAND: Schema = Schema::new(&[
        FieldSpec::optional("targets", FieldType::Targets),
        FieldSpec::required("description", FieldType::String),
    ]);

    const RULE: Schema = Schema::new(&[
        FieldSpec::required("description", FieldType::String),
        FieldSpec::optional("root", FieldType::Bool),
        FieldSpec::optional("globs", FieldType::StringList),
    ]);

    fn fm(text: &str) -> Frontmatter {
        parse(text).unwrap().frontmatter
    }

    #[test]
    fn test_valid_frontmatter_passes() {
        let input = fm("---\ndescription: Review code\ntargets: [\"*\"]\n---\n");
        let out = COMMAND.validate(&input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_missing_description_reports_exactly_that_field() {
        let input = fm("---\ntargets: [claudecode]\n---\n");
        let err = COMMAND.validate(&input).unwrap_err();
        assert_eq!(
            err.problems,
            vec![FieldProblem {
                field: "description".into(),
                kind: ProblemKind::Missing,
            }]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let input = fm("---\ndescription:\n---\n");
        let err = COMMAND.validate(&input).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["description"]);
    }

    #[test]
    fn test_all_problems_reported() {
        let input = fm("---\ndescription: 42\nroot: \"yes\"\nglobs: [1]\n---\n");
        let err = RULE.validate(&input).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec!["description", "root", "globs"]
        );
        assert_eq!(
            err.problems[0].kind,
            ProblemKind::WrongType {
                expected: FieldType::String,
                found: "number",
            }
        );
        assert!(err.to_string().contains("`root` must be a bool, found string"));
    }

    #[test]
    fn test_unknown_target_is_invalid() {
        let input = fm("---\ndescription: d\ntargets: [claudecode, notatool]\n---\n");
        let err = COMMAND.validate(&input).unwrap_err();
        assert_eq!(
            err.problems[0].kind,
            ProblemKind::InvalidValue {
                reason: "unknown target 'notatool'".into(),
            }
        );
    }

    #[test]
    fn test_single_string_normalized_to_list() {
        let input = fm("---\ndescription: d\nglobs: \"src/**/*.rs\"\n---\n");
        let out = RULE.validate(&input).unwrap();
        assert_eq!(
            out.get("globs"),
            Some(&Value::Sequence(vec![Value::from("src/**/*.rs")]))
        );
        // input is left alone
        assert_eq!(input.get("globs"), Some(&Value::from("src/**/*.rs")));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let input = fm("---\ndescription: d\nmodel: opus\nextra: [1, 2]\n---\n");
        let out = COMMAND.validate(&input).unwrap();
        assert_eq!(out.get("model"), Some(&Value::from("opus")));
        assert_eq!(out.len(), 3);
    }
}
