use crate::error::Result;

/// A text-templating engine.
///
/// Shared by the template processor, declarative hooks and variable
/// conditions, so implementations must be usable across tasks.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template` against `context`. `template_name` only shows up
    /// in error messages.
    fn render(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String>;

    /// Evaluates `expr` against `context` and reports whether the result
    /// is truthy. An empty expression is always true.
    fn execute_expression(&self, expr: &str, context: &serde_json::Value) -> Result<bool>;
}
