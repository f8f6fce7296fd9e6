mod utils;

use std::path::Path;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use modgen::config::{
    Condition, FileKind, PredefinedVariable, ProjectConfig, VariableContext, VariableDeclaration,
    VariableValue,
};
use modgen::error::{Error, Result};
use modgen::hooks::{
    ExecutableLoader, HookOutput, HookScope, Hooks, PostAction, PostProcessor, PreProcessor,
};
use modgen::pipeline::Pipeline;
use modgen::prompt::AutomaticPrompter;
use modgen::renderer::{MiniJinjaRenderer, TemplateRenderer};
use modgen::template::Template;
use modgen::vfs::{flatten, Tree, TreePatcher};
use test_log::test;
use utils::{assert_dir_matches, write_files};

fn engine() -> Arc<dyn TemplateRenderer> {
    Arc::new(MiniJinjaRenderer::new())
}

fn greeting_template(root: &Path) -> Template {
    write_files(root, &[("a.txt", "Hi {{ name }}")]);
    Template::new("greeting", root)
        .with_file("a.txt", FileKind::Template)
        .with_variable("name", VariableDeclaration::text(None).titled("Name"))
}

#[test(tokio::test)]
async fn generates_files_and_keeps_existing_ones() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_files(project.path(), &[("old", "untouched")]);

    let template = greeting_template(templates.path());
    let prompter = AutomaticPrompter::new().with_answer("name", "Ada");
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    let generation = Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .generate(&template, false)
        .await
        .unwrap();

    assert_eq!(generation.context["name"], VariableValue::from("Ada"));
    assert_eq!(generation.report.written, vec!["a.txt".to_string()]);
    assert_dir_matches(project.path(), &[("old", "untouched"), ("a.txt", "Hi Ada")]);
}

#[test(tokio::test)]
async fn existing_files_are_skipped_unless_overwriting() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_files(project.path(), &[("a.txt", "mine")]);

    let template = greeting_template(templates.path());
    let prompter = AutomaticPrompter::new().with_answer("name", "Ada");
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();
    let pipeline = Pipeline::new(engine(), &prompter, &scripts, &config, project.path());

    let generation = pipeline.generate(&template, false).await.unwrap();
    assert_eq!(generation.report.skipped, vec!["a.txt".to_string()]);
    assert_dir_matches(project.path(), &[("a.txt", "mine")]);

    pipeline.generate(&template, true).await.unwrap();
    assert_dir_matches(project.path(), &[("a.txt", "Hi Ada")]);
}

#[test(tokio::test)]
async fn conditional_variables_resolve_in_rounds_without_writing() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_files(templates.path(), &[("out.txt", "{{ a }}/{{ b }}/{{ c | default('none') }}")]);

    let template = Template::new("rounds", templates.path())
        .with_file("out.txt", FileKind::Template)
        .with_variable(
            "b",
            VariableDeclaration::text(Some("bee")).shown_if(Condition::Expression("a".to_string())),
        )
        .with_variable("a", VariableDeclaration::boolean(Some(true)))
        .with_variable(
            "c",
            // "aa" is never declared, so this never becomes ready
            VariableDeclaration::text(Some("sea"))
                .shown_if(Condition::predicate(|context: &VariableContext| context.contains_key("aa"))),
        );
    let prompter = AutomaticPrompter::new();
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    let resolution = Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .resolve(&template)
        .await
        .unwrap();

    assert_eq!(prompter.rounds(), vec![vec!["a".to_string()], vec!["b".to_string()]]);
    assert!(!resolution.context.contains_key("c"));
    assert_eq!(flatten(&resolution.tree)["out.txt"], "true/bee/none");
    assert_dir_matches(project.path(), &[]);
}

#[test(tokio::test)]
async fn predefined_values_are_fixed_or_seed_defaults() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_files(templates.path(), &[("c.txt", "{{ copyright }} by {{ author }}")]);

    let template = Template::new("credits", templates.path())
        .with_file("c.txt", FileKind::Template)
        .with_variable("copyright", VariableDeclaration::text(None))
        .with_variable("author", VariableDeclaration::text(None));
    let config = ProjectConfig {
        predefined_variables: IndexMap::from([
            (
                "copyright".to_string(),
                PredefinedVariable { value: VariableValue::from("ACME"), editable: false },
            ),
            (
                "author".to_string(),
                PredefinedVariable { value: VariableValue::from("Ada"), editable: true },
            ),
        ]),
        ..ProjectConfig::default()
    };
    let prompter = AutomaticPrompter::new();
    let scripts = ExecutableLoader::new(project.path());

    let resolution = Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .resolve(&template)
        .await
        .unwrap();

    // only the editable variable reaches the prompter, seeded with its value
    assert_eq!(prompter.rounds(), vec![vec!["author".to_string()]]);
    assert_eq!(flatten(&resolution.tree)["c.txt"], "ACME by Ada");
}

#[test(tokio::test)]
async fn unsupported_file_kind_fails_before_writing() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();

    let template = greeting_template(templates.path()).with_file("b.bin", FileKind::Unsupported);
    let prompter = AutomaticPrompter::new();
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    let result = Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .generate(&template, true)
        .await;

    assert!(matches!(result, Err(Error::UnsupportedFileKind { entry }) if entry == "b.bin"));
    assert_dir_matches(project.path(), &[]);
}

#[test(tokio::test)]
async fn cancelled_prompt_aborts_without_writing() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();

    let template = greeting_template(templates.path());
    let prompter = AutomaticPrompter::new().cancelling();
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    let result = Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .generate(&template, true)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_dir_matches(project.path(), &[]);
}

#[test(tokio::test)]
async fn closure_hooks_run_in_order() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let pre: Box<dyn PreProcessor> = Box::new(
        |mut context: VariableContext, _scope: &HookScope<'_>| -> Result<HookOutput<VariableContext>> {
            context.insert("name".to_string(), VariableValue::from("Grace"));
            Ok(context.into())
        },
    );
    let legacy_pre: Box<dyn PreProcessor> = Box::new(
        |mut context: VariableContext, _scope: &HookScope<'_>| -> Result<HookOutput<VariableContext>> {
            let name = context.get("name").and_then(VariableValue::as_str).unwrap_or_default().to_uppercase();
            context.insert("name".to_string(), VariableValue::Text(name));
            Ok(HookOutput::Deferred(Box::pin(async move { Ok(context) })))
        },
    );
    let post: Box<dyn PostProcessor> = Box::new(
        |tree: Tree, _context: &VariableContext, scope: &HookScope<'_>| -> Result<HookOutput<Tree>> {
            Ok(scope.utils.patch_tree(tree).nest(scope.module).make().into())
        },
    );
    let recorder = seen.clone();
    let actions: Box<dyn PostAction> = Box::new(
        move |tree: &Tree, _context: &VariableContext, scope: &HookScope<'_>| -> Result<HookOutput<()>> {
            let on_disk = scope.utils.project_dir().join("greeting/a.txt").exists();
            recorder.lock().unwrap().push((flatten(tree).len(), on_disk));
            Ok(().into())
        },
    );

    let template = greeting_template(templates.path()).with_hooks(Hooks {
        pre_processor: Some(pre),
        legacy_pre_processor: Some(legacy_pre),
        post_processor: Some(post),
        post_actions: Some(actions),
        ..Hooks::default()
    });
    let prompter = AutomaticPrompter::new().with_answer("name", "Ada");
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .generate(&template, false)
        .await
        .unwrap();

    assert_dir_matches(project.path(), &[("greeting/a.txt", "Hi GRACE")]);
    assert_eq!(*seen.lock().unwrap(), vec![(1, true)]);
}

#[test(tokio::test)]
async fn manifest_with_declarative_hooks() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_files(
        templates.path(),
        &[
            (
                "info.json",
                r#"{
                    "files": {"views/*.j2": {"type": "glob"}},
                    "variables": {
                        "name": {"type": "string", "default": "auth"},
                        "sources": {"type": "outputPath"}
                    },
                    "postProcessor": [
                        {"renameWith": {"template": "{{ file.name }}.rs"}},
                        {"nest": "{{ sources }}/{{ name }}"}
                    ],
                    "postActions": [
                        {"file": "src/lib.rs", "edits": [
                            {"insertAfter": {"pointer": "// modules", "text": "mod {{ name }};"}}
                        ]}
                    ]
                }"#,
            ),
            ("views/list.j2", "// list of {{ name }}"),
            ("views/form.j2", "// form of {{ name }}"),
        ],
    );
    write_files(project.path(), &[("src/lib.rs", "// modules\n")]);

    let template = Template::load("views", templates.path(), engine()).unwrap();
    let config = ProjectConfig {
        generator_output_paths: IndexMap::from([("sources".to_string(), "./src".to_string())]),
        ..ProjectConfig::default()
    };
    let prompter = AutomaticPrompter::new();
    let scripts = ExecutableLoader::new(project.path());

    Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .generate(&template, false)
        .await
        .unwrap();

    assert_dir_matches(
        project.path(),
        &[
            ("src/lib.rs", "// modules\nmod auth;\n"),
            ("src/auth/views/list.rs", "// list of auth"),
            ("src/auth/views/form.rs", "// form of auth"),
        ],
    );
}

#[cfg(unix)]
#[test(tokio::test)]
async fn manifest_with_script_hooks_and_script_files() {
    let templates = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_files(
        templates.path(),
        &[
            (
                "info.yaml",
                "files:\n  gen.sh: { type: script }\npreProcessor: pre.sh\npostActions: actions.sh\n",
            ),
            ("pre.sh", "#!/bin/sh\ncat > /dev/null\necho '{\"stamp\": \"from-pre\"}'\n"),
            ("gen.sh", "#!/bin/sh\nprintf '%s:%s' \"$1\" \"$(cat | grep -o from-pre)\"\n"),
            ("actions.sh", "#!/bin/sh\ncat > /dev/null\ntouch done.marker\n"),
        ],
    );
    for script in ["pre.sh", "gen.sh", "actions.sh"] {
        utils::make_executable(&templates.path().join(script));
    }

    let template = Template::load("scripted", templates.path(), engine()).unwrap();
    let prompter = AutomaticPrompter::new();
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .generate(&template, false)
        .await
        .unwrap();

    assert_dir_matches(project.path(), &[("gen.sh", "scripted:from-pre"), ("done.marker", "")]);
}

#[test(tokio::test)]
async fn tree_patcher_reshapes_rendered_tree() {
    let templates = tempfile::tempdir().unwrap();
    write_files(templates.path(), &[("src/x.ts", "x"), ("src/views/v.ts", "v")]);
    let template = Template::new("ts", templates.path())
        .with_file("src/x.ts", FileKind::Template)
        .with_file("src/views/v.ts", FileKind::Template);
    let project = tempfile::tempdir().unwrap();
    let prompter = AutomaticPrompter::new();
    let scripts = ExecutableLoader::new(project.path());
    let config = ProjectConfig::default();

    let resolution = Pipeline::new(engine(), &prompter, &scripts, &config, project.path())
        .resolve(&template)
        .await
        .unwrap();
    let patched = TreePatcher::new(resolution.tree).replace_directory("src", "lib").make();

    let keys: Vec<_> = flatten(&patched).into_keys().collect();
    assert_eq!(keys, vec!["lib/x.ts".to_string(), "lib/views/v.ts".to_string()]);
}
