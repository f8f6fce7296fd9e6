//! Resolution of the variable context of a template.

use indexmap::IndexMap;
use log::debug;

use crate::config::{PredefinedVariable, VariableContext, VariableDeclaration};
use crate::error::{Error, Result};
use crate::prompt::{PromptConfig, VariablePrompter};
use crate::renderer::TemplateRenderer;

/// Declarations split by what the project predefines for them.
#[derive(Debug, Default)]
pub struct PredefinedPartition {
    /// Values set by the project that the user never sees.
    pub fixed: VariableContext,
    /// Declarations that are still asked, with editable predefined values
    /// turned into their defaults. Declaration order is kept.
    pub asked: IndexMap<String, VariableDeclaration>,
}

/// Applies the project's predefined variables to `declarations`.
///
/// A non-editable predefined value removes the declaration and lands in
/// [`PredefinedPartition::fixed`]; an editable one becomes the default.
/// Predefined variables the template does not declare are ignored.
pub fn partition_predefined(
    declarations: &IndexMap<String, VariableDeclaration>,
    predefined: &IndexMap<String, PredefinedVariable>,
) -> Result<PredefinedPartition> {
    let mut partition = PredefinedPartition::default();

    for (name, declaration) in declarations {
        match predefined.get(name) {
            Some(PredefinedVariable { value, editable: false }) => {
                debug!("'{name}' is predefined as {value}");
                partition.fixed.insert(name.clone(), value.clone());
            }
            Some(PredefinedVariable { value, editable: true }) => {
                partition.asked.insert(name.clone(), declaration.with_default(name, value)?);
            }
            None => {
                partition.asked.insert(name.clone(), declaration.clone());
            }
        }
    }

    Ok(partition)
}

/// Asks `declarations` in rounds.
///
/// Each round asks, as one batch, every pending variable whose condition
/// holds against the answers collected so far. Collection stops when a
/// round finds nothing ready; variables still pending then are left out of
/// the context. A cancelled batch aborts with [`Error::Cancelled`].
pub async fn collect_variables(
    module: &str,
    declarations: IndexMap<String, VariableDeclaration>,
    prompter: &dyn VariablePrompter,
    engine: &dyn TemplateRenderer,
    config: &PromptConfig,
) -> Result<VariableContext> {
    let mut context = VariableContext::new();
    let mut pending = declarations;

    loop {
        let (ready, waiting): (IndexMap<_, _>, IndexMap<_, _>) = pending
            .into_iter()
            .partition(|(_, declaration)| declaration.is_ready(&context, engine));

        if ready.is_empty() {
            if !waiting.is_empty() {
                debug!("Never shown: {:?}", waiting.keys().collect::<Vec<_>>());
            }
            break;
        }

        debug!("Asking {:?}", ready.keys().collect::<Vec<_>>());
        let answers = prompter.ask_variables(module, &ready, config).await?.ok_or(Error::Cancelled)?;
        context.extend(answers);
        pending = waiting;
    }

    Ok(context)
}

/// Merges fixed predefined values over the collected answers.
pub fn finalize(collected: VariableContext, fixed: VariableContext) -> VariableContext {
    let mut context = collected;
    context.extend(fixed);
    context
}
