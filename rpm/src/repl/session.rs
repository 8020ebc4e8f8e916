//! Interactive form editing session

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{
    Dimension, KbcTheme, Level, OptionValue, Pedagogy, TextField, join_labels, parse_option,
};
use crate::form::save_form;
use crate::generate::{GENERATION_FAILED_MESSAGE, PlanGenerator};
use crate::prompts::PromptLoader;
use crate::render::{DocumentRenderer, OutputFormat};
use crate::session::{GenerationSession, SessionError};

const KBC_THEMES_LABEL: &str = "Tema KBC";

/// One parsed editor command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Set(TextField, String),
    Level(Level),
    Meetings(String),
    Pedagogy(u32, Pedagogy),
    Dimension(Dimension),
    Theme(KbcTheme),
    Show,
    Prompt,
    Generate(Option<PathBuf>),
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl EditCommand {
    /// Parse one input line
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };
        let cmd = cmd.trim_start_matches('/').to_lowercase();

        match cmd.as_str() {
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err("usage: set <field> <text>".to_string());
                }
                Ok(Self::Set(field.parse()?, value.to_string()))
            }
            "level" => Ok(Self::Level(parse_option(rest).map_err(|e| e.to_string())?)),
            "meetings" => Ok(Self::Meetings(rest.to_string())),
            "pedagogy" => {
                let (no, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: pedagogy <meeting-no> <value>".to_string())?;
                let no: u32 = no
                    .parse()
                    .map_err(|_| format!("'{}' is not a meeting number", no))?;
                Ok(Self::Pedagogy(no, parse_option(value.trim()).map_err(|e| e.to_string())?))
            }
            "dimension" => Ok(Self::Dimension(parse_option(rest).map_err(|e| e.to_string())?)),
            "theme" => Ok(Self::Theme(parse_option(rest).map_err(|e| e.to_string())?)),
            "show" => Ok(Self::Show),
            "prompt" => Ok(Self::Prompt),
            "generate" => Ok(Self::Generate(optional_path(rest))),
            "save" => Ok(Self::Save(optional_path(rest))),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    if rest.is_empty() { None } else { Some(PathBuf::from(rest)) }
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive editor over a [`GenerationSession`]
pub struct EditSession {
    session: GenerationSession,
    config: Config,
    prompts: PromptLoader,
    renderer: DocumentRenderer,
    generator: Option<PlanGenerator>,
    form_path: Option<PathBuf>,
}

impl EditSession {
    pub fn new(session: GenerationSession, config: Config, form_path: Option<PathBuf>) -> Result<Self> {
        debug!(?form_path, "EditSession::new: called");
        let prompts = PromptLoader::new(config.prompts_dir.clone());
        Ok(Self {
            session,
            config,
            prompts,
            renderer: DocumentRenderer::new()?,
            generator: None,
            form_path,
        })
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    /// Run the editor main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", "rpm>".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match EditCommand::parse(input) {
                        Ok(command) => {
                            if let Flow::Quit = self.execute(command).await {
                                break;
                            }
                        }
                        Err(msg) => {
                            println!("{} {}", "?".yellow(), msg);
                            println!("Type {} for available commands", "help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Sampai jumpa!");
        Ok(())
    }

    async fn execute(&mut self, command: EditCommand) -> Flow {
        debug!(?command, "EditSession::execute: called");
        match command {
            EditCommand::Generate(out) => {
                self.generate(out).await;
                Flow::Continue
            }
            EditCommand::Quit => Flow::Quit,
            other => {
                match self.apply(other) {
                    Ok(Some(msg)) => println!("{}", msg.dimmed()),
                    Ok(None) => {}
                    Err(e) => println!("{} {}", "Error:".red(), e),
                }
                Flow::Continue
            }
        }
    }

    /// Apply every command except `generate` and `quit`
    ///
    /// Returns a short status line for commands that change the form.
    pub fn apply(&mut self, command: EditCommand) -> Result<Option<String>> {
        let status = match command {
            EditCommand::Set(field, value) => {
                self.session.form_mut().set_text(field, value);
                Some(format!("{} diperbarui", field.label()))
            }
            EditCommand::Level(level) => {
                self.session.form_mut().set_level(level);
                Some(format!("Jenjang: {}", level))
            }
            EditCommand::Meetings(text) => {
                let form = self.session.form_mut();
                form.set_meeting_count_text(&text);
                Some(format!("Jumlah pertemuan: {}", form.record().meeting_count))
            }
            EditCommand::Pedagogy(no, practice) => {
                let form = self.session.form_mut();
                let updated = no
                    .checked_sub(1)
                    .is_some_and(|index| form.set_pedagogy(index as usize, practice));
                if !updated {
                    return Err(eyre::eyre!(
                        "Pertemuan {} tidak ada (1..={})",
                        no,
                        form.record().meeting_count
                    ));
                }
                Some(format!("Pertemuan {}: {}", no, practice))
            }
            EditCommand::Dimension(dimension) => {
                let added = self.session.form_mut().toggle_dimension(dimension);
                Some(format!("{} {}", if added { "+" } else { "-" }, dimension))
            }
            EditCommand::Theme(theme) => {
                let added = self.session.form_mut().toggle_kbc_theme(theme);
                Some(format!("{} {}", if added { "+" } else { "-" }, theme))
            }
            EditCommand::Show => {
                self.print_form();
                None
            }
            EditCommand::Prompt => {
                let prompt = self.prompts.rpm_prompt(self.session.form().record())?;
                println!("{}", prompt);
                None
            }
            EditCommand::Save(path) => {
                let path = path
                    .or_else(|| self.form_path.clone())
                    .ok_or_else(|| eyre::eyre!("usage: save <path>"))?;
                save_form(self.session.form().record(), &path)?;
                self.form_path = Some(path.clone());
                Some(format!("Disimpan ke {}", path.display()))
            }
            EditCommand::Help => {
                self.print_help();
                None
            }
            EditCommand::Generate(_) | EditCommand::Quit => None,
        };
        Ok(status)
    }

    async fn generate(&mut self, out: Option<PathBuf>) {
        debug!(?out, "EditSession::generate: called");
        if self.generator.is_none() {
            match PlanGenerator::from_config(&self.config) {
                Ok(generator) => self.generator = Some(generator),
                Err(e) => {
                    warn!(error = %e, "Generation failed: client setup");
                    println!("{}", GENERATION_FAILED_MESSAGE.red());
                    return;
                }
            }
        }
        let Some(generator) = self.generator.as_ref() else {
            return;
        };

        println!("{}", "Sedang Membuat RPM...".dimmed());
        match self.session.generate(generator).await {
            Ok(_) => {
                if let Err(e) = self.write_result(out) {
                    println!("{} {}", "Error:".red(), e);
                }
            }
            Err(SessionError::Generation(e)) => println!("{}", e.to_string().red()),
            Err(e) => println!("{} {}", "?".yellow(), e),
        }
    }

    fn write_result(&self, out: Option<PathBuf>) -> Result<()> {
        let Some(plan) = self.session.result() else {
            return Ok(());
        };
        let form = self.session.form().record();
        let today = chrono::Local::now().date_naive();

        match out {
            Some(path) => {
                let format = OutputFormat::from_path(&path);
                let document = self.renderer.render(plan, form, today, format)?;
                fs::write(&path, document).context(format!("Failed to write {}", path.display()))?;
                println!("{} {} ({})", "RPM ditulis ke".bright_green(), path.display(), format);
            }
            None => {
                let document = self.renderer.render(plan, form, today, OutputFormat::Markdown)?;
                println!();
                println!("{}", document);
            }
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Generator RPM".bright_cyan().bold());
        if let Some(path) = &self.form_path {
            println!("Form: {}", path.display());
        }
        println!("Type {} for help, {} to quit", "help".yellow(), "quit".yellow());
        println!();
    }

    fn print_form(&self) {
        let form = self.session.form().record();
        println!();
        println!("{}", "Data Input Perencanaan".bright_cyan());
        for field in TextField::ALL {
            let value = form.text(*field);
            let shown = if value.is_empty() { "-".dimmed().to_string() } else { value.to_string() };
            println!("  {:28} {}", field.label().yellow(), shown);
        }
        println!("  {:28} {}", "Jenjang".yellow(), form.level);
        println!("  {:28} {}", "Jumlah Pertemuan".yellow(), form.meeting_count);
        for entry in &form.pedagogies {
            println!("  {:28} {}", format!("Pertemuan {}", entry.meeting_no).yellow(), entry.practice);
        }
        println!("  {:28} {}", "Dimensi Lulusan".yellow(), join_labels(&form.dimensions, ", "));
        println!("  {:28} {}", KBC_THEMES_LABEL.yellow(), join_labels(&form.kbc_themes, ", "));
        println!();

        let gate = if self.session.can_generate() {
            "siap generate".bright_green()
        } else {
            "belum bisa generate (isi school-name dan subject)".yellow()
        };
        println!("Status: {} ({})", gate, self.session.state());
        if self.session.result().is_some() {
            println!("{}", "Hasil RPM terakhir tersedia".dimmed());
        }
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:28} Set a text field", "set <field> <text>".yellow());
        println!("  {:28} Set the school level", "level <value>".yellow());
        println!("  {:28} Set the number of meetings", "meetings <n>".yellow());
        println!("  {:28} Set the practice for one meeting", "pedagogy <no> <value>".yellow());
        println!("  {:28} Toggle a graduate dimension", "dimension <value>".yellow());
        println!("  {:28} Toggle a KBC theme", "theme <value>".yellow());
        println!("  {:28} Show the current form", "show".yellow());
        println!("  {:28} Print the generation prompt", "prompt".yellow());
        println!("  {:28} Generate (print, or write to OUT)", "generate [OUT]".yellow());
        println!("  {:28} Save the form as YAML", "save [PATH]".yellow());
        println!("  {:28} Exit", "quit".yellow());
        println!();
        println!("{}", "Fields:".bright_cyan());
        let keys: Vec<_> = TextField::ALL.iter().map(|f| f.key()).collect();
        println!("  {}", keys.join(", "));
        println!();
        print_choices::<Level>();
        print_choices::<Pedagogy>();
        print_choices::<Dimension>();
        print_choices::<KbcTheme>();
    }
}

fn print_choices<T: OptionValue>() {
    let slugs: Vec<_> = T::ALL.iter().map(|v| v.slug()).collect();
    println!("{} {}", format!("{}:", T::KIND).bright_cyan(), slugs.join(", "));
}
