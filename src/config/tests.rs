//! Tests for the config module

use std::fs;

use crate::config::{
    FileDeclarations, FileEdit, FileKind, MatchSpec, PostActionSpec, PostProcessorSpec,
    ProjectConfig, RenderKind, TemplateManifest, TreePatchStep, VariableValue,
};
use crate::error::Error;

#[test]
fn loads_project_config_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".modgen.yaml"),
        r#"
generatorOutputPaths:
  sources: ./src
predefinedVariables:
  author:
    value: Ada
    editable: true
  license:
    value: false
templatesPaths:
  module: templates/module
"#,
    )
    .unwrap();

    let config = ProjectConfig::load(dir.path()).unwrap();
    assert_eq!(config.generator_output_paths["sources"], "./src");
    assert!(config.predefined_variables["author"].editable);
    assert_eq!(config.predefined_variables["license"].value, VariableValue::Flag(false));
    assert!(!config.predefined_variables["license"].editable);
    assert_eq!(config.modules(), vec!["module".to_string()]);
    assert_eq!(
        config.template_root(dir.path(), "module").unwrap(),
        dir.path().join("templates/module")
    );
}

#[test]
fn numeric_predefined_values_are_read_as_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".modgen.yaml"),
        "predefinedVariables:\n  copyright:\n    value: 2024\n  ratio:\n    value: 1.5\n",
    )
    .unwrap();

    let config = ProjectConfig::load(dir.path()).unwrap();
    assert_eq!(config.predefined_variables["copyright"].value, VariableValue::from("2024"));
    assert_eq!(config.predefined_variables["ratio"].value, VariableValue::from("1.5"));
}

#[test]
fn json_config_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".modgen.json"), r#"{"templatesPaths": {"a": "a"}}"#).unwrap();
    fs::write(dir.path().join(".modgen.yaml"), "templatesPaths:\n  b: b\n").unwrap();

    let config = ProjectConfig::load(dir.path()).unwrap();
    assert_eq!(config.modules(), vec!["a".to_string()]);
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(ProjectConfig::load(dir.path()), Err(Error::ConfigNotFound { .. })));
}

#[test]
fn unknown_module_is_reported() {
    let config = ProjectConfig::sample();
    assert!(matches!(
        config.template_root(".", "missing"),
        Err(Error::ModuleNotFound { module }) if module == "missing"
    ));
}

#[test]
fn sample_config_round_trips() {
    let config = ProjectConfig::sample();
    let json = config.to_json().unwrap();
    assert!(json.contains("generatorOutputPaths"));
    let back: ProjectConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn file_list_shorthand_means_templates() {
    let manifest: TemplateManifest =
        serde_json::from_str(r#"{"files": ["a.txt", "b.txt"]}"#).unwrap();
    let files = manifest.files.normalize();
    assert_eq!(files.len(), 2);
    assert!(files.values().all(|kind| *kind == FileKind::Template));
}

#[test]
fn file_map_keeps_declaration_order_and_kinds() {
    let manifest: TemplateManifest = serde_json::from_str(
        r#"{"files": {
            "z.txt": {"type": "template"},
            "gen.sh": {"type": "script"},
            "views/*.j2": {"type": "glob"},
            "parts/*": {"type": "glob", "subtype": "template"},
            "odd.bin": {"type": "binary"}
        }}"#,
    )
    .unwrap();

    let FileDeclarations::Map(files) = manifest.files else {
        panic!("expected a file map");
    };
    let kinds: Vec<_> = files.values().cloned().collect();
    assert_eq!(
        kinds,
        vec![
            FileKind::Template,
            FileKind::Script,
            FileKind::Glob { subtype: None },
            FileKind::Glob { subtype: Some("template".to_string()) },
            FileKind::Unsupported,
        ]
    );
    assert_eq!(files.keys().next().map(String::as_str), Some("z.txt"));
}

#[test]
fn render_kind_inference() {
    assert_eq!(RenderKind::infer("views/a.j2"), Some(RenderKind::Template));
    assert_eq!(RenderKind::infer("a.txt"), Some(RenderKind::Template));
    assert_eq!(RenderKind::infer("gen.sh"), Some(RenderKind::Script));
    assert_eq!(RenderKind::infer("image.png"), None);
    assert_eq!(RenderKind::infer("Makefile"), None);
    assert_eq!(RenderKind::from_name("glob"), None);
}

#[test]
fn declarative_hooks_parse() {
    let manifest: TemplateManifest = serde_yaml::from_str(
        r#"
files: []
preProcessor: hooks/pre.sh
postProcessor:
  - flat
  - replaceDirectory: { match: src, with: lib }
  - moveFiles: { match: { regex: "^view" }, to: ui }
  - renameFiles: { a.txt: b.txt }
  - renameWith: { template: "{{ file.name }}.rs" }
  - nest: "{{ sources }}"
postActions:
  - file: src/lib.rs
    edits:
      - insertAfter: { pointer: "// modules", text: "mod {{ name }};" }
      - removeLines: { regex: "^// TODO" }
      - replace: { from: old, to: new }
      - trimLines
"#,
    )
    .unwrap();

    assert_eq!(manifest.pre_processor.as_deref(), Some("hooks/pre.sh"));
    let Some(PostProcessorSpec::Steps(steps)) = manifest.post_processor else {
        panic!("expected declarative post-processor");
    };
    assert_eq!(steps.len(), 6);
    assert!(matches!(steps[0], TreePatchStep::Flat));
    assert!(matches!(
        &steps[2],
        TreePatchStep::MoveFiles { matcher: MatchSpec::Regex { regex }, to } if regex == "^view" && to == "ui"
    ));

    let Some(PostActionSpec::Patches(patches)) = manifest.post_actions else {
        panic!("expected file patches");
    };
    assert_eq!(patches[0].edits.len(), 4);
    assert!(matches!(&patches[0].edits[0], FileEdit::InsertAfter(edit) if edit.preserve_indent && !edit.reverse));
    assert!(matches!(patches[0].edits[3], FileEdit::TrimLines));
}

#[test]
fn script_hooks_parse() {
    let manifest: TemplateManifest = serde_json::from_str(
        r#"{"files": [], "asyncPostProcessor": "post.sh", "postActions": "actions.sh"}"#,
    )
    .unwrap();
    assert!(matches!(manifest.async_post_processor, Some(PostProcessorSpec::Script(ref p)) if p == "post.sh"));
    assert!(matches!(manifest.post_actions, Some(PostActionSpec::Script(ref p)) if p == "actions.sh"));
}

#[test]
fn exact_match_spec_is_escaped_as_regex() {
    let regex = MatchSpec::Exact("a.b".to_string()).to_regex().unwrap();
    assert!(regex.is_match("xa.by"));
    assert!(!regex.is_match("axb"));
}

#[test]
fn missing_manifest_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(TemplateManifest::load(dir.path()), Err(Error::ManifestNotFound { .. })));
}
