use super::filters::register_filters;
use crate::{error::Result, renderer::interface::TemplateRenderer};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde_json::{json, Map, Value};

/// Name given to templates rendered without one.
const ANONYMOUS_TEMPLATE: &str = "inline";

/// Renders file templates, hook parameters and `conditionalShow`
/// expressions with MiniJinja.
///
/// Every render sees a `modgen` object (`version`, `os`, `arch`) next to
/// the variables of the context. Variables of the same name shadow it.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
    globals: Map<String, Value>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        register_filters(&mut env);
        // generated sources are never HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Lenient);

        let mut globals = Map::new();
        globals.insert(
            "modgen".to_string(),
            json!({
                "version": env!("CARGO_PKG_VERSION"),
                "os": std::env::consts::OS,
                "arch": std::env::consts::ARCH,
            }),
        );

        Self { env, globals }
    }

    /// Context objects are layered over the globals; anything else is
    /// passed through as is.
    fn scope(&self, context: &Value) -> Value {
        match context.as_object() {
            Some(variables) => {
                let mut scope = self.globals.clone();
                scope.extend(variables.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Object(scope)
            }
            None => context.clone(),
        }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &Value, template_name: Option<&str>) -> Result<String> {
        let name = template_name.unwrap_or(ANONYMOUS_TEMPLATE);
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())?;

        Ok(env.get_template(name)?.render(self.scope(context))?)
    }

    fn execute_expression(&self, expr: &str, context: &Value) -> Result<bool> {
        if expr.trim().is_empty() {
            return Ok(true);
        }
        let expression = self.env.compile_expression(expr)?;
        Ok(expression.eval(self.scope(context))?.is_true())
    }
}

#[cfg(test)]
mod tests {
    use crate::renderer::{interface::TemplateRenderer, MiniJinjaRenderer};
    use serde_json::json;

    fn assert_renders(template: &str, context: serde_json::Value, expected: &str) {
        let renderer = MiniJinjaRenderer::new();
        assert_eq!(renderer.render(template, &context, None).unwrap(), expected);
    }

    #[test]
    fn case_filters() {
        assert_renders("{{ 'hello world' | camel_case }}", json!({}), "helloWorld");
        assert_renders("{{ 'hello world' | kebab_case }}", json!({}), "hello-world");
        assert_renders("{{ 'hello world' | pascal_case }}", json!({}), "HelloWorld");
        assert_renders("{{ 'hello world' | snake_case }}", json!({}), "hello_world");
        assert_renders("{{ 'car' | plural }}", json!({}), "cars");
        assert_renders("{{ 'OrderItem' | foreign_key }}", json!({}), "order_item_id");
    }

    #[test]
    fn renders_context_variables() {
        assert_renders("Hi {{ name }}", json!({"name": "Ada"}), "Hi Ada");
        assert_renders("{% if view_model %}vm{% endif %}", json!({"view_model": false}), "");
        assert_renders("[{{ missing }}]", json!({}), "[]");
    }

    #[test]
    fn html_is_not_escaped() {
        let renderer = MiniJinjaRenderer::new();
        let result = renderer.render("{{ tag }}", &json!({"tag": "<b>"}), Some("index.html")).unwrap();
        assert_eq!(result, "<b>");
    }

    #[test]
    fn globals_are_shadowed_by_variables() {
        assert_renders("{{ modgen.version }}", json!({}), env!("CARGO_PKG_VERSION"));
        assert_renders("{{ modgen }}", json!({"modgen": "mine"}), "mine");
        assert_renders("[{{ modgen }}]", json!(42), "[]");
    }

    #[test]
    fn expressions() {
        let renderer = MiniJinjaRenderer::new();
        assert!(renderer.execute_expression("", &json!({})).unwrap());
        assert!(renderer.execute_expression("lang == 'rust'", &json!({"lang": "rust"})).unwrap());
        assert!(!renderer.execute_expression("lang == 'rust'", &json!({})).unwrap());
        assert!(!renderer.execute_expression("typo_flag", &json!({"flag": true})).unwrap());
    }
}
