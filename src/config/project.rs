//! Project configuration stored at the root of the project

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::loader::load_first;
use super::variable::VariableValue;
use crate::constants::CONFIG_FILENAMES;
use crate::error::{Error, Result};

/// A value supplied by the project for a template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedVariable {
    pub value: VariableValue,
    /// When set the value only seeds the default and the user is still asked.
    #[serde(default)]
    pub editable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Named output directories offered by `outputPath` variables.
    #[serde(default)]
    pub generator_output_paths: IndexMap<String, String>,
    #[serde(default)]
    pub predefined_variables: IndexMap<String, PredefinedVariable>,
    /// Module name -> template directory, relative to the project.
    #[serde(default)]
    pub templates_paths: IndexMap<String, String>,
}

impl ProjectConfig {
    pub fn load<P: AsRef<Path>>(project_dir: P) -> Result<Self> {
        let project_dir = project_dir.as_ref();
        load_first(project_dir, CONFIG_FILENAMES)?.ok_or_else(|| Error::ConfigNotFound {
            project_dir: project_dir.display().to_string(),
            config_files: CONFIG_FILENAMES.join(", "),
        })
    }

    /// The configuration written by `modgen init`.
    pub fn sample() -> Self {
        Self {
            generator_output_paths: IndexMap::from([
                ("sources".to_string(), "./src".to_string()),
                ("tests".to_string(), "./tests".to_string()),
            ]),
            predefined_variables: IndexMap::from([(
                "copyright".to_string(),
                PredefinedVariable {
                    value: VariableValue::Text("Template copyright".to_string()),
                    editable: false,
                },
            )]),
            templates_paths: IndexMap::from([
                ("module".to_string(), "templates/module".to_string()),
                ("service".to_string(), "templates/service".to_string()),
            ]),
        }
    }

    pub fn modules(&self) -> Vec<String> {
        self.templates_paths.keys().cloned().collect()
    }

    pub fn template_root<P: AsRef<Path>>(&self, project_dir: P, module: &str) -> Result<PathBuf> {
        self.templates_paths
            .get(module)
            .map(|path| project_dir.as_ref().join(path))
            .ok_or_else(|| Error::ModuleNotFound { module: module.to_string() })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
