//! Prompter answering without user interaction
//!
//! Answers come from presets first and from the declared defaults
//! otherwise. Useful for `--non-interactive` runs, CI and tests.

use async_trait::async_trait;
use indexmap::IndexMap;
use log::debug;
use std::sync::Mutex;

use super::interface::{PromptConfig, VariablePrompter};
use crate::config::{VariableContext, VariableDeclaration, VariableValue};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct AutomaticPrompter {
    answers: VariableContext,
    module: Option<String>,
    cancel: bool,
    rounds: Mutex<Vec<Vec<String>>>,
}

impl AutomaticPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(mut self, answers: VariableContext) -> Self {
        self.answers.extend(answers);
        self
    }

    pub fn with_answer(mut self, name: &str, value: impl Into<VariableValue>) -> Self {
        self.answers.insert(name.to_string(), value.into());
        self
    }

    /// Module answered by [`VariablePrompter::ask_module`]; the first
    /// candidate when unset.
    pub fn with_module(mut self, module: &str) -> Self {
        self.module = Some(module.to_string());
        self
    }

    /// Makes every variable batch report a cancellation.
    pub fn cancelling(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Names of the variables asked in each round so far.
    pub fn rounds(&self) -> Vec<Vec<String>> {
        self.rounds.lock().map(|rounds| rounds.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VariablePrompter for AutomaticPrompter {
    async fn ask_module(&self, candidates: &[String]) -> Result<Option<String>> {
        Ok(match &self.module {
            Some(module) => candidates.iter().find(|candidate| *candidate == module).cloned(),
            None => candidates.first().cloned(),
        })
    }

    async fn ask_variables(
        &self,
        module: &str,
        declarations: &IndexMap<String, VariableDeclaration>,
        config: &PromptConfig,
    ) -> Result<Option<VariableContext>> {
        let names: Vec<String> = declarations.keys().cloned().collect();
        debug!("{module}: answering {names:?}");
        if let Ok(mut rounds) = self.rounds.lock() {
            rounds.push(names);
        }

        if self.cancel {
            return Ok(None);
        }

        let answers = declarations
            .iter()
            .map(|(name, declaration)| {
                let value = self
                    .answers
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| declaration.fallback_value(&config.output_paths));
                (name.clone(), value)
            })
            .collect();
        Ok(Some(answers))
    }
}
