//! Dialoguer-based implementation of [`VariablePrompter`]
//!
//! Dialoguer blocks the calling thread, so every interaction runs on the
//! blocking pool of the runtime. Pressing Esc on any prompt cancels the
//! whole batch.

use async_trait::async_trait;
use dialoguer::console::style;
use dialoguer::{Confirm, FuzzySelect, Input, Select};
use indexmap::IndexMap;
use log::warn;

use super::interface::{PromptConfig, VariablePrompter};
use crate::config::{VariableContext, VariableDeclaration, VariableKind, VariableValue};
use crate::error::{Error, Result};

/// Terminal prompter
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

async fn blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| Error::Other(e.into()))?
}

/// Position of `default` among `choices`, the first choice otherwise.
fn default_index(prompt: &str, choices: &[String], default: Option<&str>) -> usize {
    let Some(default) = default else {
        return 0;
    };
    choices.iter().position(|choice| choice == default).unwrap_or_else(|| {
        warn!("{prompt}: default '{default}' is not a choice, preselecting the first one");
        0
    })
}

/// Without choices there is nothing to show; the default is the answer.
fn pick(prompt: &str, choices: &[String], default: Option<&str>) -> Result<Option<String>> {
    if choices.is_empty() {
        println!("{}", style(format!("{prompt}: nothing to choose from")).dim());
        return Ok(Some(default.unwrap_or_default().to_string()));
    }

    let index = Select::new()
        .with_prompt(prompt)
        .items(choices)
        .default(default_index(prompt, choices, default))
        .interact_opt()?;
    Ok(index.and_then(|index| choices.get(index).cloned()))
}

/// A dismissed file picker answers an empty path.
fn pick_file(prompt: &str, candidates: &[String], default: Option<&str>) -> Result<String> {
    if candidates.is_empty() {
        println!("{}", style(format!("{prompt}: no matching files")).dim());
        return Ok(default.unwrap_or_default().to_string());
    }

    let index = FuzzySelect::new()
        .with_prompt(prompt)
        .items(candidates)
        .default(default_index(prompt, candidates, default))
        .interact_opt()?;
    Ok(index.and_then(|index| candidates.get(index).cloned()).unwrap_or_default())
}

fn ask(
    name: &str,
    declaration: &VariableDeclaration,
    config: &PromptConfig,
) -> Result<Option<VariableValue>> {
    let title = declaration.title.as_deref().unwrap_or(name);
    if let Some(description) = &declaration.description {
        println!("{}", style(description).dim());
    }

    let value = match &declaration.kind {
        VariableKind::Text { default } => {
            let value: String = Input::new()
                .with_prompt(title)
                .default(default.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?;
            Some(VariableValue::Text(value))
        }
        VariableKind::Boolean { default } => Confirm::new()
            .with_prompt(title)
            .default(default.unwrap_or(false))
            .interact_opt()?
            .map(VariableValue::Flag),
        VariableKind::Picker { variants, default } => {
            pick(title, variants, default.as_deref())?.map(VariableValue::Choice)
        }
        VariableKind::OutputPath { default } => {
            let paths: Vec<String> = config.output_paths.values().cloned().collect();
            pick(title, &paths, default.as_deref())?.map(VariableValue::Choice)
        }
        VariableKind::FilePicker { variants, default } => {
            let mut candidates = Vec::new();
            for variant in variants {
                candidates.extend(variant.resolve(&config.project_dir)?);
            }
            Some(VariableValue::Text(pick_file(title, &candidates, default.as_deref())?))
        }
    };
    Ok(value)
}

fn ask_all(
    module: &str,
    declarations: &IndexMap<String, VariableDeclaration>,
    config: &PromptConfig,
) -> Result<Option<VariableContext>> {
    println!("{}", style(format!("Setup {module} (press Esc to cancel)")).bold());

    let mut answers = VariableContext::new();
    for (name, declaration) in declarations {
        match ask(name, declaration, config)? {
            Some(value) => {
                answers.insert(name.clone(), value);
            }
            None => return Ok(None),
        }
    }

    let generate = Confirm::new().with_prompt("Generate?").default(true).interact_opt()?;
    Ok(if generate == Some(true) { Some(answers) } else { None })
}

#[async_trait]
impl VariablePrompter for DialoguerPrompter {
    async fn ask_module(&self, candidates: &[String]) -> Result<Option<String>> {
        let candidates = candidates.to_vec();
        blocking(move || {
            let index = FuzzySelect::new()
                .with_prompt("Pick module")
                .items(&candidates)
                .default(0)
                .interact_opt()?;
            Ok(index.and_then(|index| candidates.get(index).cloned()))
        })
        .await
    }

    async fn ask_variables(
        &self,
        module: &str,
        declarations: &IndexMap<String, VariableDeclaration>,
        config: &PromptConfig,
    ) -> Result<Option<VariableContext>> {
        if declarations.is_empty() {
            return Ok(Some(VariableContext::new()));
        }

        let module = module.to_string();
        let declarations = declarations.clone();
        let config = config.clone();
        blocking(move || ask_all(&module, &declarations, &config)).await
    }
}
