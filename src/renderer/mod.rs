//! Text-templating service used to render template files, inserted
//! lines and `conditionalShow` expressions.

pub mod filters;
pub mod interface;
pub mod minijinja;

pub use interface::TemplateRenderer;
pub use minijinja::MiniJinjaRenderer;
