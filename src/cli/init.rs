//! `modgen init`: writes a default project configuration or a sample template.

use log::info;
use std::path::Path;

use super::args::{InitArgs, InitTarget};
use crate::config::ProjectConfig;
use crate::constants::CONFIG_FILENAMES;
use crate::error::{Error, Result};
use crate::vfs::{insert_path, materialize, MaterializeReport, Tree};

const SAMPLE_MANIFEST: &str = r#"{
  "files": {
    "presenter.j2": { "type": "template" },
    "view.j2": { "type": "template" }
  },
  "variables": {
    "copyright": { "type": "string", "title": "Copyright" },
    "moduleName": { "type": "string", "title": "Module name", "default": "sample" },
    "sources": { "type": "outputPath", "title": "Destination" },
    "withView": { "type": "boolean", "title": "Generate a view?", "default": true },
    "viewKind": {
      "type": "picker",
      "title": "View kind",
      "variants": ["list", "form"],
      "conditionalShow": "withView"
    }
  },
  "postProcessor": [
    { "renameWith": { "template": "{{ file.name }}.rs" } },
    { "nest": "{{ sources }}/{{ moduleName | snake_case }}" }
  ]
}
"#;

const SAMPLE_PRESENTER: &str = r#"// {{ copyright }}

pub struct {{ moduleName | pascal_case }}Presenter;

impl {{ moduleName | pascal_case }}Presenter {
    pub fn new() -> Self {
        Self
    }
}
"#;

const SAMPLE_VIEW: &str = r#"// {{ copyright }}
{% if withView %}
/// A {{ viewKind }} view of {{ moduleName }}.
pub struct {{ moduleName | pascal_case }}View;
{% endif %}"#;

const SAMPLE_CHECK: &str = "Sample template files live in templates/module.\n";

/// The files of `modgen init template-sample`, relative to the project.
pub fn sample_template() -> Tree {
    let mut tree = Tree::new();
    insert_path(&mut tree, "templates/module/info.json", SAMPLE_MANIFEST);
    insert_path(&mut tree, "templates/module/presenter.j2", SAMPLE_PRESENTER);
    insert_path(&mut tree, "templates/module/view.j2", SAMPLE_VIEW);
    insert_path(&mut tree, "templates/module/check/check.txt", SAMPLE_CHECK);
    tree
}

/// Writes the default configuration; an existing configuration is kept
/// and nothing is written.
pub async fn init_config(project_dir: &Path) -> Result<MaterializeReport> {
    if let Some(existing) = CONFIG_FILENAMES.iter().map(|name| project_dir.join(name)).find(|path| path.exists()) {
        println!("Configuration already exists at '{}', leaving it as is.", existing.display());
        return Ok(MaterializeReport::default());
    }

    let mut tree = Tree::new();
    insert_path(&mut tree, CONFIG_FILENAMES[0], ProjectConfig::sample().to_json()?);
    Ok(materialize(&tree, project_dir, false).await)
}

/// Writes the sample template, replacing files of a previous sample.
pub async fn init_template_sample(project_dir: &Path) -> Result<MaterializeReport> {
    Ok(materialize(&sample_template(), project_dir, true).await)
}

pub async fn run_init(args: &InitArgs, project_dir: &Path) -> Result<()> {
    let report = match args.target {
        InitTarget::Main => init_config(project_dir).await?,
        InitTarget::TemplateSample => init_template_sample(project_dir).await?,
    };

    for path in &report.written {
        info!("created {path}");
    }
    if !report.failed.is_empty() {
        return Err(Error::Other(anyhow::anyhow!(
            "Failed to write: {}",
            report.failed.join(", ")
        )));
    }
    println!("Initialized {} in {}.", args.target, project_dir.display());
    Ok(())
}
