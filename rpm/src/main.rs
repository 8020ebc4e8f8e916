//! Generator RPM - Perencanaan Pembelajaran Mendalam
//!
//! CLI entry point for generating lesson plans from form files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use rpmgen::cli::{Cli, Command};
use rpmgen::config::Config;
use rpmgen::domain::{Dimension, KbcTheme, Level, OptionValue, Pedagogy};
use rpmgen::form::{STARTER_FORM, load_form};
use rpmgen::generate::{GENERATION_FAILED_MESSAGE, PlanGenerator, plan_schema};
use rpmgen::prompts::PromptLoader;
use rpmgen::render::{DocumentRenderer, OutputFormat};
use rpmgen::repl;
use rpmgen::session::{GenerationSession, SessionError};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rpmgen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("rpmgen.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Generator RPM loaded config: model={}", config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate { form, output, format } => {
            debug!(?form, ?output, %format, "main: matched Generate command");
            cmd_generate(&config, &form, output.as_deref(), format).await
        }
        Command::Prompt { form } => {
            debug!(?form, "main: matched Prompt command");
            cmd_prompt(&config, &form)
        }
        Command::Schema => {
            debug!("main: matched Schema command");
            cmd_schema()
        }
        Command::Init { path, force } => {
            debug!(?path, force, "main: matched Init command");
            cmd_init(&path, force)
        }
        Command::Options => {
            debug!("main: matched Options command");
            cmd_options();
            Ok(())
        }
        Command::Edit { form } => {
            debug!(?form, "main: matched Edit command");
            repl::run_interactive(&config, form).await
        }
    }
}

async fn cmd_generate(config: &Config, form_path: &Path, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    debug!(?form_path, ?output, %format, "cmd_generate: called");
    let form = load_form(form_path)?;
    let mut session = GenerationSession::new(form);
    if !session.can_generate() {
        debug!("cmd_generate: form not submittable");
        return Err(SessionError::NotSubmittable.into());
    }

    let generator = PlanGenerator::from_config(config).map_err(|e| {
        warn!(error = %e, "Generation failed: client setup");
        eyre::eyre!(GENERATION_FAILED_MESSAGE)
    })?;
    let renderer = DocumentRenderer::new()?;

    eprintln!("{}", "Sedang Membuat RPM...".dimmed());
    let plan = session.generate(&generator).await?.clone();

    let today = chrono::Local::now().date_naive();
    let document = renderer.render(&plan, session.form().record(), today, format)?;

    match output {
        Some(path) => {
            debug!(?path, "cmd_generate: writing document to file");
            fs::write(path, document).context(format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "RPM ditulis ke".bright_green(), path.display());
        }
        None => {
            debug!("cmd_generate: writing document to stdout");
            println!("{}", document);
        }
    }
    info!("Generated {} document for {}", format, plan.identitas.school_name);
    Ok(())
}

fn cmd_prompt(config: &Config, form_path: &Path) -> Result<()> {
    debug!(?form_path, "cmd_prompt: called");
    let form = load_form(form_path)?;
    let prompt = PromptLoader::new(config.prompts_dir.clone()).rpm_prompt(form.record())?;
    println!("{}", prompt);
    Ok(())
}

fn cmd_schema() -> Result<()> {
    debug!("cmd_schema: called");
    let schema = serde_json::to_string_pretty(&plan_schema()).context("Failed to serialize schema")?;
    println!("{}", schema);
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    debug!(?path, force, "cmd_init: called");
    if path.exists() && !force {
        debug!("cmd_init: refusing to overwrite");
        return Err(eyre::eyre!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, STARTER_FORM).context(format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Created".bright_green(), path.display());
    println!("Fill it in, then run: rpmgen generate {}", path.display());
    Ok(())
}

fn cmd_options() {
    debug!("cmd_options: called");
    print_option_list::<Level>();
    print_option_list::<Pedagogy>();
    print_option_list::<Dimension>();
    print_option_list::<KbcTheme>();

    println!("{}", "format".bright_cyan());
    for format in OutputFormat::ALL {
        println!("  {}", format);
    }
}

fn print_option_list<T: OptionValue>() {
    println!("{}", T::KIND.bright_cyan());
    for value in T::ALL {
        println!("  {:24} {}", value.slug().yellow(), value.label());
    }
    println!();
}
