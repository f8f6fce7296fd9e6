//! Variable declarations and resolved variable values.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// A resolved variable value.
///
/// Numbers in configuration files and preset answers are read as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariableValue {
    Flag(bool),
    Text(String),
    /// One of the variants of a picker. Serialized like [`VariableValue::Text`].
    Choice(String),
}

impl VariableValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariableValue::Text(value) | VariableValue::Choice(value) => Some(value),
            VariableValue::Flag(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VariableValue::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for VariableValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Flag(flag) => VariableValue::Flag(flag),
            RawValue::Integer(number) => VariableValue::Text(number.to_string()),
            RawValue::Float(number) => VariableValue::Text(number.to_string()),
            RawValue::Text(text) => VariableValue::Text(text),
        })
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Flag(value) => write!(f, "{value}"),
            VariableValue::Text(value) | VariableValue::Choice(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Text(value.to_string())
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::Flag(value)
    }
}

/// Variable name -> resolved value, in resolution order.
pub type VariableContext = IndexMap<String, VariableValue>;

/// Converts a context to the JSON object handed to templates and hooks.
pub fn context_to_json(context: &VariableContext) -> serde_json::Value {
    serde_json::Value::Object(
        context
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    VariableValue::Flag(flag) => serde_json::Value::Bool(*flag),
                    VariableValue::Text(text) | VariableValue::Choice(text) => {
                        serde_json::Value::String(text.clone())
                    }
                };
                (name.clone(), value)
            })
            .collect(),
    )
}

/// Gate deciding whether a variable is collected yet.
#[derive(Clone)]
pub enum Condition {
    /// Template expression evaluated against the answers so far.
    Expression(String),
    Predicate(Arc<dyn Fn(&VariableContext) -> bool + Send + Sync>),
}

impl Condition {
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&VariableContext) -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(check))
    }

    /// Evaluation errors count as "not satisfied".
    pub fn is_satisfied(&self, context: &VariableContext, engine: &dyn TemplateRenderer) -> bool {
        match self {
            Condition::Expression(expr) => {
                match engine.execute_expression(expr, &context_to_json(context)) {
                    Ok(satisfied) => satisfied,
                    Err(e) => {
                        warn!("Failed to evaluate condition '{expr}': {e}");
                        false
                    }
                }
            }
            Condition::Predicate(check) => check(context),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Expression(expr) => f.debug_tuple("Expression").field(expr).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Condition::Expression)
    }
}

/// A candidate of a file picker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileVariant {
    Plain(String),
    Typed(TypedFileVariant),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedFileVariant {
    Path(String),
    /// Expanded relative to the project directory.
    Glob(String),
}

impl FileVariant {
    pub fn resolve(&self, project_dir: &Path) -> Result<Vec<String>> {
        match self {
            FileVariant::Plain(path) | FileVariant::Typed(TypedFileVariant::Path(path)) => {
                Ok(vec![path.clone()])
            }
            FileVariant::Typed(TypedFileVariant::Glob(pattern)) => {
                crate::glob::expand(pattern, project_dir)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VariableKind {
    #[serde(rename = "string")]
    Text {
        #[serde(default)]
        default: Option<String>,
    },
    Boolean {
        #[serde(default)]
        default: Option<bool>,
    },
    Picker {
        variants: Vec<String>,
        #[serde(default)]
        default: Option<String>,
    },
    FilePicker {
        variants: Vec<FileVariant>,
        #[serde(default)]
        default: Option<String>,
    },
    /// Picker over the project's generator output paths.
    OutputPath {
        #[serde(default)]
        default: Option<String>,
    },
}

impl VariableKind {
    pub fn name(&self) -> &'static str {
        match self {
            VariableKind::Text { .. } => "string",
            VariableKind::Boolean { .. } => "boolean",
            VariableKind::Picker { .. } => "picker",
            VariableKind::FilePicker { .. } => "filePicker",
            VariableKind::OutputPath { .. } => "outputPath",
        }
    }
}

/// A variable declared by a template manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub conditional_show: Option<Condition>,
    #[serde(flatten)]
    pub kind: VariableKind,
}

impl VariableDeclaration {
    pub fn new(kind: VariableKind) -> Self {
        Self { title: None, description: None, conditional_show: None, kind }
    }

    pub fn text(default: Option<&str>) -> Self {
        Self::new(VariableKind::Text { default: default.map(str::to_string) })
    }

    pub fn boolean(default: Option<bool>) -> Self {
        Self::new(VariableKind::Boolean { default })
    }

    pub fn picker(variants: &[&str], default: Option<&str>) -> Self {
        Self::new(VariableKind::Picker {
            variants: variants.iter().map(|v| v.to_string()).collect(),
            default: default.map(str::to_string),
        })
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn shown_if(mut self, condition: Condition) -> Self {
        self.conditional_show = Some(condition);
        self
    }

    /// Whether the variable can be collected given the answers so far.
    pub fn is_ready(&self, context: &VariableContext, engine: &dyn TemplateRenderer) -> bool {
        self.conditional_show
            .as_ref()
            .is_none_or(|condition| condition.is_satisfied(context, engine))
    }

    /// Returns a copy whose default is `value`.
    ///
    /// Fails when the value does not fit the kind of the variable.
    pub fn with_default(&self, name: &str, value: &VariableValue) -> Result<Self> {
        let mut seeded = self.clone();
        match (&mut seeded.kind, value) {
            (VariableKind::Boolean { default }, VariableValue::Flag(flag)) => {
                *default = Some(*flag);
            }
            (
                VariableKind::Text { default }
                | VariableKind::Picker { default, .. }
                | VariableKind::FilePicker { default, .. }
                | VariableKind::OutputPath { default },
                VariableValue::Text(text) | VariableValue::Choice(text),
            ) => {
                *default = Some(text.clone());
            }
            (kind, value) => {
                return Err(Error::InvalidDefault {
                    variable: name.to_string(),
                    kind: kind.name().to_string(),
                    value: value.to_string(),
                })
            }
        }
        Ok(seeded)
    }

    /// Value used when nobody answers: the declared default, else the
    /// first choice, else an empty string or `false`.
    pub fn fallback_value(&self, output_paths: &IndexMap<String, String>) -> VariableValue {
        match &self.kind {
            VariableKind::Text { default } | VariableKind::FilePicker { default, .. } => {
                VariableValue::Text(default.clone().unwrap_or_default())
            }
            VariableKind::Boolean { default } => VariableValue::Flag(default.unwrap_or(false)),
            VariableKind::Picker { variants, default } => VariableValue::Choice(
                default.clone().or_else(|| variants.first().cloned()).unwrap_or_default(),
            ),
            VariableKind::OutputPath { default } => VariableValue::Choice(
                default
                    .clone()
                    .or_else(|| output_paths.values().next().cloned())
                    .unwrap_or_default(),
            ),
        }
    }
}
