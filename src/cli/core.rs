//! Shell context, dispatch, and CLI error types.

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::cli::{commands, io as cli_io};
use crate::config::{Config, ConfigManager};
use crate::core::audit;
use crate::core::services::ServiceError;
use crate::errors::StoreError;
use crate::interpreter::{Interpreter, QuickAddDefaults};
use crate::ledger::Ledger;
use crate::storage::{JsonStorage, StorageBackend};

/// How the shell consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures scoped to a single command; the loop reports them and carries on.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("no ledger loaded")]
    LedgerNotLoaded,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("exit requested")]
    ExitRequested,
}

/// Failures that end the whole CLI session.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const COMMAND_NAMES: [&str; 26] = [
    "account",
    "add",
    "audit",
    "backup",
    "backups",
    "breakdown",
    "budget",
    "category",
    "clear-data",
    "config",
    "diary",
    "exit",
    "export",
    "help",
    "holiday",
    "ledger",
    "plan",
    "quit",
    "restore",
    "say",
    "settings",
    "summary",
    "task",
    "transfer",
    "trend",
    "tx",
];

/// Everything a command handler needs: the open ledger, persistence, config,
/// and the quick-add interpreter.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) storage: JsonStorage,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) interpreter: Interpreter,
    pub(crate) ledger: Option<Ledger>,
    pub(crate) dirty: bool,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(None, Some(config.backup_retention))?;
        let interpreter = Interpreter::new(QuickAddDefaults {
            account_id: config.quick_add_account_id,
            category_id: config.quick_add_category_id,
            currency: config.quick_add_currency.clone(),
        });

        let mut context = Self {
            mode,
            storage,
            config_manager,
            config,
            interpreter,
            ledger: None,
            dirty: false,
            running: true,
        };
        context.auto_load_last()?;
        Ok(context)
    }

    fn auto_load_last(&mut self) -> Result<(), CliError> {
        if self.mode != CliMode::Interactive {
            return Ok(());
        }
        let Some(name) = self.config.last_opened_ledger.clone() else {
            return Ok(());
        };
        if !self.storage.ledger_exists(&name) {
            return Ok(());
        }
        match self.storage.load(&name) {
            Ok(ledger) => {
                self.report_warnings(&audit::scan(&ledger));
                self.ledger = Some(ledger);
                cli_io::print_success(format!("Automatically loaded last ledger `{name}`."));
            }
            Err(err) => {
                cli_io::print_warning(format!("Could not reload `{name}`: {err}"));
            }
        }
        Ok(())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMAND_NAMES.to_vec()
    }

    pub fn prompt(&self) -> String {
        let marker = if self.dirty { "*" } else { "" };
        match &self.ledger {
            Some(ledger) => format!("daybook({}){marker}> ", ledger.name),
            None => format!("daybook{marker}> "),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let outcome = match command {
            "ledger" => commands::handle_ledger(self, args),
            "backup" => commands::handle_backup(self),
            "backups" => commands::handle_backups(self),
            "restore" => commands::handle_restore(self, args),
            "add" => commands::handle_add(self, args),
            "transfer" => commands::handle_transfer(self, args),
            "say" => commands::handle_say(self, args),
            "tx" => commands::handle_tx(self, args),
            "summary" => commands::handle_summary(self, args),
            "breakdown" => commands::handle_breakdown(self, args),
            "budget" => commands::handle_budget(self, args),
            "trend" => commands::handle_trend(self, args),
            "account" => commands::handle_account(self, args),
            "category" => commands::handle_category(self, args),
            "task" => commands::handle_task(self, args),
            "plan" => commands::handle_plan(self, args),
            "holiday" => commands::handle_holiday(self, args),
            "diary" => commands::handle_diary(self, args),
            "export" => commands::handle_export(self, args),
            "audit" => commands::handle_audit(self, args),
            "settings" => commands::handle_settings(self, args),
            "config" => commands::handle_config(self, args),
            "clear-data" => commands::handle_clear_data(self),
            "help" => commands::handle_help(self),
            "exit" | "quit" => Err(CommandError::ExitRequested),
            _ => {
                self.suggest_command(raw);
                return Ok(LoopControl::Continue);
            }
        };

        match outcome {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let mut suggestions: Vec<_> = COMMAND_NAMES
            .iter()
            .map(|name| (levenshtein(name, input), *name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{best}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.dirty {
            "Discard unsaved changes and exit?"
        } else {
            "Exit shell?"
        };
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(!self.dirty)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help` for usage details.");
                Ok(())
            }
            CommandError::LedgerNotLoaded => {
                cli_io::print_error("No ledger loaded. Use `ledger new` or `ledger open` first.");
                cli_io::print_hint("Try `ledger new Personal` to get started.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn report_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn require_ledger(&self) -> Result<&Ledger, CommandError> {
        self.ledger.as_ref().ok_or(CommandError::LedgerNotLoaded)
    }

    pub(crate) fn require_ledger_mut(&mut self) -> Result<&mut Ledger, CommandError> {
        self.ledger.as_mut().ok_or(CommandError::LedgerNotLoaded)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuilds the quick-add defaults after a config change.
    pub(crate) fn refresh_interpreter(&mut self) {
        self.interpreter = Interpreter::new(QuickAddDefaults {
            account_id: self.config.quick_add_account_id,
            category_id: self.config.quick_add_category_id,
            currency: self.config.quick_add_currency.clone(),
        });
    }

    /// Makes `name` the open ledger and remembers it for the next session.
    pub(crate) fn adopt_ledger(&mut self, ledger: Ledger) {
        self.config.last_opened_ledger = Some(ledger.name.clone());
        if let Err(err) = self.config_manager.save(&self.config) {
            cli_io::print_warning(format!("Could not persist config: {err}"));
        }
        self.ledger = Some(ledger);
        self.dirty = false;
    }

    #[cfg(test)]
    pub(crate) fn for_tests(base: &std::path::Path) -> Self {
        let config_manager =
            ConfigManager::with_base_dir(base.to_path_buf()).expect("config manager");
        let config = config_manager.load().expect("load config");
        let storage = JsonStorage::new(Some(base.to_path_buf()), Some(config.backup_retention))
            .expect("storage backend");
        let interpreter = Interpreter::new(QuickAddDefaults {
            account_id: config.quick_add_account_id,
            category_id: config.quick_add_category_id,
            currency: config.quick_add_currency.clone(),
        });
        Self {
            mode: CliMode::Script,
            storage,
            config_manager,
            config,
            interpreter,
            ledger: None,
            dirty: false,
            running: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }
        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: &std::path::Path, lines: &[&str]) -> ShellContext {
    let mut context = ShellContext::for_tests(base);
    for line in lines {
        match context.process_line(line).expect("command runs") {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn script_runner_creates_and_saves_a_ledger() {
        let temp = TempDir::new().expect("create temp dir");
        let context = process_script(temp.path(), &["ledger new Demo", "exit"]);
        let ledger = context.ledger.as_ref().expect("ledger present");
        assert_eq!(ledger.name, "Demo");
        assert_eq!(ledger.categories.len(), 15);
        assert!(context.storage.ledger_exists("Demo"));
        assert!(!context.dirty);
    }

    #[test]
    fn quick_add_records_an_expense() {
        let temp = TempDir::new().expect("create temp dir");
        let context = process_script(
            temp.path(),
            &["ledger new Demo", "say Today I spent 100 rupees for food"],
        );
        let ledger = context.ledger.as_ref().expect("ledger present");
        assert_eq!(ledger.transactions.len(), 1);
        let txn = &ledger.transactions[0];
        assert_eq!(txn.amount, 100.0);
        assert_eq!(txn.category_id, crate::domain::common::RecordId(1));
        assert!(context.dirty);
    }

    #[test]
    fn saving_clears_the_dirty_flag() {
        let temp = TempDir::new().expect("create temp dir");
        let context = process_script(
            temp.path(),
            &[
                "ledger new Demo",
                "add expense 42.50 Shopping new shoes",
                "ledger save",
            ],
        );
        assert!(!context.dirty);
        let stored = context.storage.load("Demo").expect("reload ledger");
        assert_eq!(stored.transactions.len(), 1);
        assert_eq!(stored.transactions[0].amount, 42.5);
    }

    #[test]
    fn commands_without_a_ledger_are_rejected() {
        let temp = TempDir::new().expect("create temp dir");
        let mut context = ShellContext::for_tests(temp.path());
        let err = context.process_line("summary").expect_err("no ledger");
        assert!(matches!(err, CommandError::LedgerNotLoaded));
    }

    #[test]
    fn unknown_commands_keep_the_loop_alive() {
        let temp = TempDir::new().expect("create temp dir");
        let mut context = ShellContext::for_tests(temp.path());
        let control = context.process_line("frobnicate").expect("handled");
        assert_eq!(control, LoopControl::Continue);
        assert!(context.running);
    }

    #[test]
    fn exit_breaks_the_dispatch_loop() {
        let temp = TempDir::new().expect("create temp dir");
        let mut context = ShellContext::for_tests(temp.path());
        let control = context.process_line("exit").expect("handled");
        assert_eq!(control, LoopControl::Exit);
    }
}
