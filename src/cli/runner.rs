use crate::{
    cli::{args::GenArgs, init::run_init, Cli, Commands},
    config::{PredefinedVariable, ProjectConfig, VariableContext},
    constants::{ANY_MODULE, STDIN_INDICATOR},
    error::{Error, Result},
    hooks::ExecutableLoader,
    pipeline::{Generation, Pipeline},
    prompt::{AutomaticPrompter, DialoguerPrompter, VariablePrompter},
    renderer::{MiniJinjaRenderer, TemplateRenderer},
    template::Template,
};
use log::{debug, error};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs `modgen gen`: picks the module, loads its template and generates it.
pub struct Runner {
    args: GenArgs,
    project_dir: PathBuf,
}

impl Runner {
    pub fn new<P: AsRef<Path>>(args: GenArgs, project_dir: P) -> Self {
        Self { args, project_dir: project_dir.as_ref().to_path_buf() }
    }

    /// Executes the complete generation workflow
    pub async fn run(self) -> Result<Generation> {
        let engine: Arc<dyn TemplateRenderer> = Arc::new(MiniJinjaRenderer::new());
        let mut config = ProjectConfig::load(&self.project_dir)?;
        let answers = self.preset_answers()?;

        let prompter: Box<dyn VariablePrompter> = if self.args.non_interactive {
            Box::new(AutomaticPrompter::new().with_answers(answers))
        } else {
            Self::seed_defaults(&mut config, answers);
            Box::new(DialoguerPrompter::new())
        };

        let module = self.select_module(&config, prompter.as_ref()).await?;
        let template_root = config.template_root(&self.project_dir, &module)?;
        let template = Template::load(&module, template_root, engine.clone())?;

        let scripts = ExecutableLoader::new(&self.project_dir);
        let pipeline =
            Pipeline::new(engine, prompter.as_ref(), &scripts, &config, &self.project_dir);
        let generation = pipeline.generate(&template, self.args.overwrite).await?;

        for path in &generation.report.failed {
            error!("Failed to write {path}");
        }
        println!(
            "Generated {module} in {}: {} written, {} skipped.",
            self.project_dir.display(),
            generation.report.written.len(),
            generation.report.skipped.len()
        );
        Ok(generation)
    }

    /// Parses `--answers`, reading stdin for `-`.
    fn preset_answers(&self) -> Result<VariableContext> {
        let Some(answers) = &self.args.answers else {
            return Ok(VariableContext::new());
        };

        let answers = if answers == STDIN_INDICATOR {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            answers.clone()
        };
        let answers: VariableContext = serde_json::from_str(&answers)?;
        debug!("Preset answers: {answers:?}");
        Ok(answers)
    }

    /// Turns preset answers into editable defaults; values the project
    /// fixes stay fixed.
    fn seed_defaults(config: &mut ProjectConfig, answers: VariableContext) {
        for (name, value) in answers {
            match config.predefined_variables.get(&name) {
                Some(PredefinedVariable { editable: false, .. }) => {}
                _ => {
                    config
                        .predefined_variables
                        .insert(name, PredefinedVariable { value, editable: true });
                }
            }
        }
    }

    async fn select_module(
        &self,
        config: &ProjectConfig,
        prompter: &dyn VariablePrompter,
    ) -> Result<String> {
        let modules = config.modules();
        if modules.is_empty() {
            return Err(Error::NoModules);
        }

        if self.args.module != ANY_MODULE {
            return if modules.contains(&self.args.module) {
                Ok(self.args.module.clone())
            } else {
                Err(Error::ModuleNotFound { module: self.args.module.clone() })
            };
        }

        if let [module] = modules.as_slice() {
            debug!("Only one module configured, using '{module}'");
            return Ok(module.clone());
        }
        prompter.ask_module(&modules).await?.ok_or(Error::Cancelled)
    }
}

/// Main entry point for CLI execution
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => run_init(&args, &cli.project_dir).await,
        Commands::Gen(args) => Runner::new(args, &cli.project_dir).run().await.map(|_| ()),
    }
}
