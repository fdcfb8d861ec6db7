//! Command handlers, one `handle_*` per top-level command. Multi-action
//! commands dispatch on a noun-verb pattern (`account add`, `budget set`).

use chrono::{Datelike, Local, NaiveDate};

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::core::audit;
use crate::core::services::{
    AccountService, BudgetService, CategoryService, DiaryService, PlanService, ReportService,
    TaskService, TransactionService,
};
use crate::domain::account::{Account, AccountKind};
use crate::domain::budget::{Budget, BudgetPeriod};
use crate::domain::category::{Category, CategoryKind};
use crate::domain::common::RecordId;
use crate::domain::plan::{Plan, PlanKind};
use crate::domain::reporting::PeriodKind;
use crate::domain::settings::Theme;
use crate::domain::task::Task;
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::export;
use crate::interpreter::Intent;
use crate::ledger::Ledger;
use crate::storage::StorageBackend;

const HELP_LINES: [&str; 26] = [
    "ledger <new|open|save|list|close>   manage stored ledgers",
    "backup                              snapshot the current ledger file",
    "backups                             list snapshots, newest first",
    "restore <index>                     roll back to a listed snapshot",
    "add <expense|income> <amount> <category> [description]",
    "transfer <from> <to> <amount> [description]",
    "say <text>                          quick-add from free text",
    "tx <list|remove>                    inspect or delete transactions",
    "summary [week|month|year]           income/expense totals",
    "breakdown [week|month|year]         per-category spending shares",
    "budget <set|list|remove>            manage category budgets",
    "trend [months]                      month-by-month income and expenses",
    "account <list|add|remove>           manage accounts",
    "category <list|add|remove>          manage categories",
    "task <add|list|toggle|remove>       manage tasks",
    "plan <list|add>                     manage trips, events, goals, projects",
    "holiday [year] | holiday set <year> <total> [used]",
    "diary                               list diary entries, newest first",
    "export <csv|json> <path>            write transactions to a file",
    "audit [fix]                         scan the ledger for inconsistencies",
    "settings [currency|theme|alerts]    per-ledger settings",
    "config <show|set>                   application configuration",
    "clear-data                          wipe transactions and budgets",
    "help                                this list",
    "exit                                leave the shell",
    "quit                                alias for exit",
];

// ---------------------------------------------------------------------------
// ledger lifecycle

pub(crate) fn handle_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: ledger <new|open|save|list|close>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "new" => ledger_new(context, rest),
        "open" | "load" => ledger_open(context, rest),
        "save" => ledger_save(context),
        "list" => ledger_list(context),
        "close" => ledger_close(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown ledger subcommand `{other}`. Available: new, open, save, list, close"
        ))),
    }
}

fn ledger_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: ledger new <name>".into(),
        ));
    }
    let name = args.join(" ");
    if context.storage.ledger_exists(&name) {
        return Err(CommandError::InvalidArguments(format!(
            "ledger `{name}` already exists; use `ledger open {name}`"
        )));
    }
    let ledger = Ledger::with_defaults(&name);
    context.storage.save(&ledger, &name)?;
    context.adopt_ledger(ledger);
    cli_io::print_success(format!("New ledger `{name}` created."));
    Ok(())
}

fn ledger_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: ledger open <name>".into(),
        ));
    }
    let name = args.join(" ");
    let ledger = context.storage.load(&name)?;
    context.report_warnings(&audit::scan(&ledger));
    context.adopt_ledger(ledger);
    cli_io::print_success(format!("Ledger `{name}` loaded."));
    Ok(())
}

fn ledger_save(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let name = ledger.name.clone();
    context.storage.save(ledger, &name)?;
    context.dirty = false;
    cli_io::print_success(format!("Ledger `{name}` saved."));
    Ok(())
}

fn ledger_list(context: &mut ShellContext) -> CommandResult {
    let names = context.storage.list_ledgers()?;
    if names.is_empty() {
        cli_io::print_warning("No ledgers stored yet. Use `ledger new <name>`.");
        return Ok(());
    }
    cli_io::print_section("Ledgers");
    for name in names {
        cli_io::print_line(format!("  {name}"));
    }
    Ok(())
}

fn ledger_close(context: &mut ShellContext) -> CommandResult {
    if context.ledger.is_none() {
        cli_io::print_warning("No ledger loaded.");
        return Ok(());
    }
    if context.dirty && context.mode == CliMode::Interactive {
        let keep_going = cli_io::confirm_action("Discard unsaved changes?", false)?;
        if !keep_going {
            cli_io::print_info("Close cancelled.");
            return Ok(());
        }
    }
    context.ledger = None;
    context.dirty = false;
    cli_io::print_success("Ledger closed.");
    Ok(())
}

// ---------------------------------------------------------------------------
// backups

pub(crate) fn handle_backup(context: &mut ShellContext) -> CommandResult {
    let name = context.require_ledger()?.name.clone();
    let path = context.storage.backup(&name)?;
    cli_io::print_success(format!("Backup created at {}.", path.display()));
    Ok(())
}

pub(crate) fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let name = context.require_ledger()?.name.clone();
    let backups = context.storage.list_backups(&name)?;
    if backups.is_empty() {
        cli_io::print_warning("No backups yet. Use `backup` to create one.");
        return Ok(());
    }
    cli_io::print_section("Backups");
    for (index, path) in backups.iter().enumerate() {
        cli_io::print_line(format!("  [{index}] {}", path.display()));
    }
    Ok(())
}

pub(crate) fn handle_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_index) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: restore <index> (see `backups`)".into(),
        ));
    };
    let index: usize = raw_index.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw_index}` is not a backup index"))
    })?;
    let name = context.require_ledger()?.name.clone();
    let backups = context.storage.list_backups(&name)?;
    let Some(backup) = backups.get(index) else {
        return Err(CommandError::InvalidArguments(format!(
            "no backup at index {index}; `backups` lists {} entries",
            backups.len()
        )));
    };
    let restored = context.storage.restore(&name, backup)?;
    context.ledger = Some(restored);
    context.dirty = false;
    cli_io::print_success(format!(
        "Ledger `{name}` restored from {}.",
        backup.display()
    ));
    Ok(())
}

// ---------------------------------------------------------------------------
// transactions

pub(crate) fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(
            "usage: add <expense|income> <amount> <category> [description]".into(),
        ));
    }
    let kind = match args[0].to_ascii_lowercase().as_str() {
        "expense" => TransactionKind::Expense,
        "income" => TransactionKind::Income,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "`{other}` is not a transaction kind; use expense or income"
            )))
        }
    };
    let amount = parse_amount(args[1])?;
    let side = match kind {
        TransactionKind::Expense => CategoryKind::Expense,
        _ => CategoryKind::Income,
    };
    let description = args[3..].join(" ");

    let account_id = context.config.quick_add_account_id;
    let ledger = context.require_ledger()?;
    let (category_id, category_name) = find_category(ledger, args[2], Some(side))?;
    let currency = ledger.settings.currency.clone();

    let record = Transaction::new(kind, amount, category_id, account_id, today())
        .with_description(description)
        .with_currency(currency);
    let ledger = context.require_ledger_mut()?;
    TransactionService::add(ledger, record)?;
    context.mark_dirty();
    match kind {
        TransactionKind::Income => {
            cli_io::print_success(format!("Income recorded: {amount:.2} in {category_name}."))
        }
        _ => cli_io::print_success(format!("Expense recorded: {amount:.2} in {category_name}.")),
    }
    Ok(())
}

pub(crate) fn handle_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(
            "usage: transfer <from_account> <to_account> <amount> [description]".into(),
        ));
    }
    let amount = parse_amount(args[2])?;
    let description = if args.len() > 3 {
        args[3..].join(" ")
    } else {
        format!("Transfer from {} to {}", args[0], args[1])
    };

    let ledger = context.require_ledger()?;
    let (from, from_name) = find_account(ledger, args[0])?;
    let (to, to_name) = find_account(ledger, args[1])?;

    let ledger = context.require_ledger_mut()?;
    TransactionService::transfer(ledger, from, to, amount, today(), description)?;
    context.mark_dirty();
    cli_io::print_success(format!(
        "Transferred {amount:.2} from {from_name} to {to_name}."
    ));
    Ok(())
}

pub(crate) fn handle_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: tx <list|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" => tx_list(context),
        "remove" | "rm" => tx_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown tx subcommand `{other}`. Available: list, remove"
        ))),
    }
}

fn tx_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let transactions = TransactionService::list(ledger);
    if transactions.is_empty() {
        cli_io::print_warning("No transactions recorded.");
        return Ok(());
    }
    cli_io::print_section("Transactions");
    for txn in transactions {
        let category = ledger
            .category(txn.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        cli_io::print_line(format!(
            "  [{}] {} {:<8} {:>10.2} {}  {}  {}",
            txn.id, txn.date, txn.kind, txn.amount, txn.currency, category, txn.description
        ));
    }
    Ok(())
}

fn tx_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "usage: tx remove <id>")?;
    let ledger = context.require_ledger_mut()?;
    let removed = TransactionService::remove(ledger, id)?;
    context.mark_dirty();
    cli_io::print_success(format!(
        "Transaction {id} removed ({} {:.2}).",
        removed.kind, removed.amount
    ));
    Ok(())
}

// ---------------------------------------------------------------------------
// quick add

pub(crate) fn handle_say(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: say <free text describing what happened>".into(),
        ));
    }
    let text = args.join(" ");
    let ledger = context.require_ledger()?;
    let parsed = context.interpreter.interpret(&text, ledger, today());

    if !parsed.is_actionable() {
        cli_io::print_warning(format!(
            "Could not understand that ({:.0}% confidence as `{}`).",
            parsed.confidence * 100.0,
            parsed.intent.label()
        ));
        cli_io::print_hint("Try a structured command instead; `help` lists them.");
        return Ok(());
    }

    cli_io::print_info(format!(
        "Interpreted as {} ({:.0}% confidence).",
        parsed.intent.label(),
        parsed.confidence * 100.0
    ));

    let ledger = context.require_ledger_mut()?;
    match parsed.intent {
        Intent::Task(draft) => {
            let title = draft.title.clone();
            TaskService::add(ledger, draft.into_task())?;
            cli_io::print_success(format!("Task added: {title}"));
        }
        Intent::Expense(draft) | Intent::Income(draft) => {
            let amount = draft.amount;
            let kind = draft.kind;
            let category = ledger
                .category(draft.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "-".into());
            TransactionService::add(ledger, draft.into_transaction())?;
            cli_io::print_success(format!("Recorded {kind}: {amount:.2} in {category}."));
        }
        Intent::Diary(draft) => {
            let title = draft.title.clone();
            DiaryService::add(ledger, draft.into_entry())?;
            cli_io::print_success(format!("Diary entry added: {title}"));
        }
        Intent::Budget(draft) => {
            let amount = draft.amount;
            let category = ledger
                .category(draft.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "-".into());
            BudgetService::add(ledger, draft.into_budget())?;
            cli_io::print_success(format!("Budget set: {amount:.2} for {category}."));
        }
        Intent::Unknown => unreachable!("unknown intents are never actionable"),
    }
    context.mark_dirty();
    Ok(())
}

// ---------------------------------------------------------------------------
// reports

pub(crate) fn handle_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = parse_period(args.first().copied())?;
    let ledger = context.require_ledger()?;
    let reference = today();
    let window = period.resolve(reference);
    let totals = ReportService::period_totals(&ledger.transactions, period, reference);

    cli_io::print_section(format!("Summary ({period})"));
    cli_io::print_line(format!("  Window:   {window}"));
    cli_io::print_line(format!("  Income:   {:>12.2}", totals.income));
    cli_io::print_line(format!("  Expenses: {:>12.2}", totals.expense));
    cli_io::print_line(format!("  Balance:  {:>12.2}", totals.balance));
    Ok(())
}

pub(crate) fn handle_breakdown(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = parse_period(args.first().copied())?;
    let ledger = context.require_ledger()?;
    let window = period.resolve(today());
    let in_window: Vec<Transaction> = ledger
        .transactions
        .iter()
        .filter(|txn| window.contains(txn.date))
        .cloned()
        .collect();
    let rows = ReportService::category_breakdown(&in_window, &ledger.categories);
    if rows.is_empty() {
        cli_io::print_warning(format!("No categorized activity in {window}."));
        return Ok(());
    }
    cli_io::print_section(format!("Breakdown ({period})"));
    for row in rows {
        cli_io::print_line(format!(
            "  {:<20} {:>10.2}  {:>5.1}%",
            row.category.name, row.total, row.percentage
        ));
    }
    Ok(())
}

pub(crate) fn handle_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let months = match args.first() {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a month count"))
        })?,
        None => context.config.trend_months,
    };
    if months == 0 {
        return Err(CommandError::InvalidArguments(
            "month count must be at least 1".into(),
        ));
    }
    let ledger = context.require_ledger()?;
    let series = ReportService::monthly_trend(&ledger.transactions, months, today());
    cli_io::print_section("Monthly trend");
    for point in series {
        cli_io::print_line(format!(
            "  {:<9} income {:>10.2}  expenses {:>10.2}",
            point.label, point.income, point.expense
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// budgets

pub(crate) fn handle_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: budget <set|list|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "set" | "add" => budget_set(context, rest),
        "list" => budget_list(context),
        "remove" | "rm" => budget_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget subcommand `{other}`. Available: set, list, remove"
        ))),
    }
}

fn budget_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: budget set <category> <amount> [weekly|monthly|yearly]".into(),
        ));
    }
    let amount = parse_amount(args[1])?;
    let period = match args.get(2) {
        Some(raw) => BudgetPeriod::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{raw}` is not a budget period; use weekly, monthly, or yearly"
            ))
        })?,
        None => BudgetPeriod::default(),
    };

    let ledger = context.require_ledger()?;
    let (category_id, category_name) = find_category(ledger, args[0], Some(CategoryKind::Expense))?;
    let currency = ledger.settings.currency.clone();
    let budget = Budget::new(category_id, amount, period, today()).with_currency(currency);

    let ledger = context.require_ledger_mut()?;
    BudgetService::add(ledger, budget)?;
    context.mark_dirty();
    cli_io::print_success(format!(
        "Budget set for {category_name}: {amount:.2} {period}."
    ));
    Ok(())
}

fn budget_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let budgets = BudgetService::list(ledger);
    if budgets.is_empty() {
        cli_io::print_warning("No budgets defined. Use `budget set <category> <amount>`.");
        return Ok(());
    }
    cli_io::print_section("Budgets");
    let reference = today();
    for budget in budgets {
        let category = ledger
            .category(budget.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        let progress =
            ReportService::budget_progress_at(budget, &ledger.transactions, reference);
        let marker = if progress.over_budget {
            "  OVER BUDGET"
        } else if progress.alert_breached(budget.alert_threshold) {
            "  nearing limit"
        } else {
            ""
        };
        cli_io::print_line(format!(
            "  [{}] {:<20} {:>10.2} / {:<10.2} ({:>5.1}%) {}{marker}",
            budget.id, category, progress.spent, budget.amount, progress.percentage, budget.period
        ));
    }
    Ok(())
}

fn budget_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "usage: budget remove <id>")?;
    let ledger = context.require_ledger_mut()?;
    BudgetService::remove(ledger, id)?;
    context.mark_dirty();
    cli_io::print_success(format!("Budget {id} removed."));
    Ok(())
}

// ---------------------------------------------------------------------------
// accounts and categories

pub(crate) fn handle_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: account <list|add|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" => account_list(context),
        "add" => account_add(context, rest),
        "remove" | "rm" => account_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown account subcommand `{other}`. Available: list, add, remove"
        ))),
    }
}

fn account_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let accounts = AccountService::list(ledger);
    if accounts.is_empty() {
        cli_io::print_warning("No accounts defined.");
        return Ok(());
    }
    cli_io::print_section("Accounts");
    for account in accounts {
        cli_io::print_line(format!(
            "  [{}] {:<16} {:<14} {:>12.2} {}",
            account.id, account.name, account.kind, account.balance, account.currency
        ));
    }
    cli_io::print_line(format!(
        "  Total balance: {:.2}",
        AccountService::total_balance(ledger)
    ));
    Ok(())
}

fn account_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: account add <name> <cash|bank|credit-card|digital-wallet|investment|other> [currency]".into(),
        ));
    }
    let kind = parse_account_kind(args[1])?;
    let mut account = Account::new(args[0], kind);
    if let Some(currency) = args.get(2) {
        account = account.with_currency(currency.to_uppercase());
    }
    let name = account.name.clone();
    let ledger = context.require_ledger_mut()?;
    let id = AccountService::add(ledger, account)?;
    context.mark_dirty();
    cli_io::print_success(format!("Account `{name}` added with id {id}."));
    Ok(())
}

fn account_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: account remove <id|name>".into(),
        ));
    };
    let ledger = context.require_ledger()?;
    let (id, name) = match raw.parse::<i64>() {
        Ok(numeric) => {
            let id = RecordId(numeric);
            let account = ledger
                .account(id)
                .ok_or_else(|| CommandError::InvalidArguments(format!("no account with id {id}")))?;
            (id, account.name.clone())
        }
        Err(_) => find_account(ledger, raw)?,
    };
    if context.mode == CliMode::Interactive {
        let confirmed = cli_io::confirm_action(&format!("Delete account \"{name}\"?"), false)?;
        if !confirmed {
            cli_io::print_info("Delete cancelled.");
            return Ok(());
        }
    }
    let ledger = context.require_ledger_mut()?;
    AccountService::remove(ledger, id)?;
    context.mark_dirty();
    cli_io::print_success(format!("Account `{name}` deleted."));
    Ok(())
}

pub(crate) fn handle_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: category <list|add|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" => category_list(context),
        "add" => category_add(context, rest),
        "remove" | "rm" => category_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{other}`. Available: list, add, remove"
        ))),
    }
}

fn category_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    cli_io::print_section("Categories");
    for category in CategoryService::list(ledger) {
        let origin = if category.is_default { "preset" } else { "custom" };
        cli_io::print_line(format!(
            "  [{}] {:<20} {:<8} {origin}",
            category.id, category.name, category.kind
        ));
    }
    Ok(())
}

fn category_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: category add <name> <expense|income>".into(),
        ));
    }
    let kind = match args[1].to_ascii_lowercase().as_str() {
        "expense" => CategoryKind::Expense,
        "income" => CategoryKind::Income,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "`{other}` is not a category kind; use expense or income"
            )))
        }
    };
    let category = Category::new(args[0], kind);
    let name = category.name.clone();
    let ledger = context.require_ledger_mut()?;
    let id = CategoryService::add(ledger, category)?;
    context.mark_dirty();
    cli_io::print_success(format!("Category `{name}` added with id {id}."));
    Ok(())
}

fn category_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: category remove <id|name>".into(),
        ));
    };
    let ledger = context.require_ledger()?;
    let (id, name) = match raw.parse::<i64>() {
        Ok(numeric) => {
            let id = RecordId(numeric);
            let category = ledger.category(id).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no category with id {id}"))
            })?;
            (id, category.name.clone())
        }
        Err(_) => {
            let category = ledger.category_by_name(raw, None).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no category named `{raw}`"))
            })?;
            (category.id, category.name.clone())
        }
    };
    let ledger = context.require_ledger_mut()?;
    CategoryService::remove(ledger, id)?;
    context.mark_dirty();
    cli_io::print_success(format!("Category `{name}` deleted."));
    Ok(())
}

// ---------------------------------------------------------------------------
// tasks

pub(crate) fn handle_task(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: task <add|list|toggle|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => task_add(context, rest),
        "list" => task_list(context),
        "toggle" | "done" => task_toggle(context, rest),
        "remove" | "rm" => task_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown task subcommand `{other}`. Available: add, list, toggle, remove"
        ))),
    }
}

fn task_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: task add <title>".into(),
        ));
    }
    let title = args.join(" ");
    let ledger = context.require_ledger_mut()?;
    let id = TaskService::add(ledger, Task::new(&title))?;
    context.mark_dirty();
    cli_io::print_success(format!("Task added with id {id}: {title}"));
    Ok(())
}

fn task_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let tasks = TaskService::list(ledger);
    if tasks.is_empty() {
        cli_io::print_warning("No tasks yet.");
        return Ok(());
    }
    cli_io::print_section("Tasks");
    let reference = today();
    for task in tasks {
        let done = if task.is_completed() { "x" } else { " " };
        let due = match task.due_date {
            Some(date) if task.is_overdue(reference) => format!("  due {date} (overdue)"),
            Some(date) => format!("  due {date}"),
            None => String::new(),
        };
        cli_io::print_line(format!(
            "  [{}] [{done}] {:<30} {} {}{due}",
            task.id, task.title, task.priority, task.category
        ));
    }
    Ok(())
}

fn task_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "usage: task toggle <id>")?;
    let ledger = context.require_ledger_mut()?;
    let status = TaskService::toggle_status(ledger, id)?;
    context.mark_dirty();
    cli_io::print_success(format!("Task {id} is now {status}."));
    Ok(())
}

fn task_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args.first().copied(), "usage: task remove <id>")?;
    let ledger = context.require_ledger_mut()?;
    let removed = TaskService::remove(ledger, id)?;
    context.mark_dirty();
    cli_io::print_success(format!("Task {id} removed: {}", removed.title));
    Ok(())
}

// ---------------------------------------------------------------------------
// plans and holidays

pub(crate) fn handle_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: plan <list|add>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "list" => plan_list(context),
        "add" => plan_add(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown plan subcommand `{other}`. Available: list, add"
        ))),
    }
}

fn plan_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let plans = PlanService::list(ledger);
    if plans.is_empty() {
        cli_io::print_warning("No plans yet. Use `plan add <kind> <start> <end> <title>`.");
        return Ok(());
    }
    cli_io::print_section("Plans");
    for plan in plans {
        let holidays = if plan.holidays_used > 0 {
            format!("  {} holiday days", plan.holidays_used)
        } else {
            String::new()
        };
        cli_io::print_line(format!(
            "  [{}] {:<24} {:<8} {:<10} {} to {}{holidays}",
            plan.id, plan.title, plan.kind, plan.status, plan.start_date, plan.end_date
        ));
    }
    Ok(())
}

fn plan_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(CommandError::InvalidArguments(
            "usage: plan add <trip|event|goal|project> <start YYYY-MM-DD> <end YYYY-MM-DD> <title>"
                .into(),
        ));
    }
    let kind = parse_plan_kind(args[0])?;
    let start = parse_date(args[1])?;
    let end = parse_date(args[2])?;
    let title = args[3..].join(" ");
    let ledger = context.require_ledger_mut()?;
    let id = PlanService::add(ledger, Plan::new(&title, kind, start, end))?;
    context.mark_dirty();
    cli_io::print_success(format!("Plan added with id {id}: {title}"));
    Ok(())
}

pub(crate) fn handle_holiday(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|s| s.to_ascii_lowercase()) {
        Some(sub) if sub == "set" => holiday_set(context, &args[1..]),
        Some(raw) => {
            let year = parse_year(&raw)?;
            holiday_show(context, year)
        }
        None => holiday_show(context, today().year()),
    }
}

fn holiday_show(context: &mut ShellContext, year: i32) -> CommandResult {
    let ledger = context.require_ledger_mut()?;
    let balance = PlanService::refresh_holiday_balance(ledger, year)?;
    context.mark_dirty();
    cli_io::print_section(format!("Holiday balance {year}"));
    cli_io::print_line(format!("  Total:     {:>4}", balance.total_days));
    cli_io::print_line(format!("  Used:      {:>4}", balance.used_days));
    cli_io::print_line(format!("  Planned:   {:>4}", balance.planned_days));
    cli_io::print_line(format!("  Available: {:>4}", balance.available_days));
    if balance.available_days < 0 {
        cli_io::print_warning("Confirmed trips exceed the remaining allowance.");
    }
    Ok(())
}

fn holiday_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: holiday set <year> <total_days> [used_days]".into(),
        ));
    }
    let year = parse_year(args[0])?;
    let total: u32 = args[1].parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a day count", args[1]))
    })?;
    let used: Option<u32> = match args.get(2) {
        Some(raw) => Some(raw.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a day count"))
        })?),
        None => None,
    };
    let ledger = context.require_ledger_mut()?;
    let balance = PlanService::update_holiday_balance(ledger, year, |balance| {
        balance.total_days = total;
        if let Some(used) = used {
            balance.used_days = used;
        }
    })?;
    context.mark_dirty();
    cli_io::print_success(format!(
        "Holiday balance {year} updated: {} of {} days available.",
        balance.available_days, balance.total_days
    ));
    Ok(())
}

// ---------------------------------------------------------------------------
// diary

pub(crate) fn handle_diary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|s| s.to_ascii_lowercase()) {
        None => diary_list(context),
        Some(sub) if sub == "list" => diary_list(context),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown diary subcommand `{other}`. Entries are added with `say`."
        ))),
    }
}

fn diary_list(context: &mut ShellContext) -> CommandResult {
    let ledger = context.require_ledger()?;
    let entries = DiaryService::list(ledger);
    if entries.is_empty() {
        cli_io::print_warning("No diary entries. Try `say I feel great today`.");
        return Ok(());
    }
    cli_io::print_section("Diary");
    for entry in entries {
        cli_io::print_line(format!(
            "  [{}] {} {:<9} {}",
            entry.id, entry.date, entry.mood, entry.title
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// export and audit

pub(crate) fn handle_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (Some(format), Some(raw_path)) = (args.first(), args.get(1)) else {
        return Err(CommandError::InvalidArguments(
            "usage: export <csv|json> <path>".into(),
        ));
    };
    let path = std::path::PathBuf::from(raw_path);
    let ledger = context.require_ledger()?;
    match format.to_ascii_lowercase().as_str() {
        "csv" => export::export_csv(ledger, &path)?,
        "json" => export::export_json(ledger, &path)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown export format `{other}`. Available: csv, json"
            )))
        }
    }
    cli_io::print_success(format!(
        "Exported {} transactions to {}.",
        ledger.transaction_count(),
        path.display()
    ));
    Ok(())
}

pub(crate) fn handle_audit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(first) = args.first() {
        if first.eq_ignore_ascii_case("fix") {
            let ledger = context.require_ledger_mut()?;
            let repaired = audit::repair_holiday_balances(ledger)?;
            if repaired.is_empty() {
                cli_io::print_info("No holiday balances needed repair.");
            } else {
                context.mark_dirty();
                for year in &repaired {
                    cli_io::print_success(format!("Holiday balance {year} recomputed."));
                }
            }
        } else {
            return Err(CommandError::InvalidArguments(
                "usage: audit [fix]".into(),
            ));
        }
    }
    let ledger = context.require_ledger()?;
    let warnings = audit::scan(ledger);
    if warnings.is_empty() {
        cli_io::print_success("No inconsistencies found.");
        return Ok(());
    }
    for warning in &warnings {
        cli_io::print_warning(warning);
    }
    cli_io::print_info(format!("{} issue(s) found.", warnings.len()));
    Ok(())
}

// ---------------------------------------------------------------------------
// settings and config

pub(crate) fn handle_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        let ledger = context.require_ledger()?;
        cli_io::print_section("Settings");
        cli_io::print_line(format!("  currency:      {}", ledger.settings.currency));
        cli_io::print_line(format!("  theme:         {}", ledger.settings.theme));
        cli_io::print_line(format!("  notifications: {}", ledger.settings.notifications));
        cli_io::print_line(format!("  budget alerts: {}", ledger.settings.budget_alerts));
        cli_io::print_line(format!("  language:      {}", ledger.settings.language));
        return Ok(());
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "currency" => {
            let Some(code) = rest.first() else {
                return Err(CommandError::InvalidArguments(
                    "usage: settings currency <code>".into(),
                ));
            };
            let code = code.to_uppercase();
            let ledger = context.require_ledger_mut()?;
            ledger.update_settings(|settings| settings.currency = code.clone());
            context.mark_dirty();
            cli_io::print_success(format!("Ledger currency set to {code}."));
            Ok(())
        }
        "theme" => {
            let theme = rest
                .first()
                .and_then(|raw| Theme::parse(raw))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(
                        "usage: settings theme <light|dark|auto>".into(),
                    )
                })?;
            let ledger = context.require_ledger_mut()?;
            ledger.update_settings(|settings| settings.theme = theme);
            context.mark_dirty();
            cli_io::print_success(format!("Theme set to {theme}."));
            Ok(())
        }
        "alerts" => {
            let enabled = match rest.first().map(|s| s.to_ascii_lowercase()) {
                Some(flag) if flag == "on" || flag == "true" => true,
                Some(flag) if flag == "off" || flag == "false" => false,
                _ => {
                    return Err(CommandError::InvalidArguments(
                        "usage: settings alerts <on|off>".into(),
                    ))
                }
            };
            let ledger = context.require_ledger_mut()?;
            ledger.update_settings(|settings| settings.budget_alerts = enabled);
            context.mark_dirty();
            cli_io::print_success(format!(
                "Budget alerts {}.",
                if enabled { "enabled" } else { "disabled" }
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown settings subcommand `{other}`. Available: currency, theme, alerts"
        ))),
    }
}

pub(crate) fn handle_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|s| s.to_ascii_lowercase()) {
        None => config_show(context),
        Some(sub) if sub == "show" => config_show(context),
        Some(sub) if sub == "set" => config_set(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`. Available: show, set"
        ))),
    }
}

fn config_show(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    cli_io::print_section("Config");
    cli_io::print_line(format!("  currency:              {}", config.currency));
    cli_io::print_line(format!(
        "  quick-add-currency:    {}",
        config.quick_add_currency
    ));
    cli_io::print_line(format!(
        "  quick-add-account:     {}",
        config.quick_add_account_id
    ));
    cli_io::print_line(format!(
        "  quick-add-category:    {}",
        config.quick_add_category_id
    ));
    cli_io::print_line(format!("  trend-months:          {}", config.trend_months));
    cli_io::print_line(format!(
        "  backup-retention:      {}",
        config.backup_retention
    ));
    cli_io::print_line(format!(
        "  last-opened-ledger:    {}",
        config.last_opened_ledger.as_deref().unwrap_or("-")
    ));
    cli_io::print_line(format!(
        "  file:                  {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn config_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (Some(key), Some(value)) = (args.first(), args.get(1)) else {
        return Err(CommandError::InvalidArguments(
            "usage: config set <key> <value>".into(),
        ));
    };
    match key.to_ascii_lowercase().as_str() {
        "currency" => context.config.currency = value.to_uppercase(),
        "quick-add-currency" => context.config.quick_add_currency = value.to_uppercase(),
        "quick-add-account" => {
            context.config.quick_add_account_id = RecordId(parse_numeric(value)?)
        }
        "quick-add-category" => {
            context.config.quick_add_category_id = RecordId(parse_numeric(value)?)
        }
        "trend-months" => {
            let months: u32 = value.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{value}` is not a month count"))
            })?;
            if months == 0 {
                return Err(CommandError::InvalidArguments(
                    "trend-months must be at least 1".into(),
                ));
            }
            context.config.trend_months = months;
        }
        "backup-retention" => {
            context.config.backup_retention = value.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{value}` is not a retention count"))
            })?;
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}`"
            )))
        }
    }
    context.config_manager.save(&context.config)?;
    context.refresh_interpreter();
    cli_io::print_success(format!("Config `{key}` updated."));
    Ok(())
}

// ---------------------------------------------------------------------------
// maintenance

pub(crate) fn handle_clear_data(context: &mut ShellContext) -> CommandResult {
    context.require_ledger()?;
    if context.mode == CliMode::Interactive {
        let confirmed = cli_io::confirm_action(
            "Wipe all transactions, budgets, and custom categories?",
            false,
        )?;
        if !confirmed {
            cli_io::print_info("Clear cancelled.");
            return Ok(());
        }
    }
    let ledger = context.require_ledger_mut()?;
    ledger.clear_data();
    context.mark_dirty();
    cli_io::print_success("Transactions, budgets, and custom categories cleared.");
    Ok(())
}

pub(crate) fn handle_help(_context: &mut ShellContext) -> CommandResult {
    cli_io::print_section("Commands");
    for line in HELP_LINES {
        cli_io::print_line(format!("  {line}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// shared parsing helpers

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let amount: f64 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not an amount")))?;
    if amount <= 0.0 || !amount.is_finite() {
        return Err(CommandError::InvalidArguments(
            "amount must be a positive number".into(),
        ));
    }
    Ok(amount)
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
    })
}

fn parse_year(raw: &str) -> Result<i32, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a year")))
}

fn parse_numeric(raw: &str) -> Result<i64, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a numeric id")))
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<RecordId, CommandError> {
    let raw = raw.ok_or_else(|| CommandError::InvalidArguments(usage.to_string()))?;
    Ok(RecordId(parse_numeric(raw)?))
}

fn parse_period(raw: Option<&str>) -> Result<PeriodKind, CommandError> {
    match raw {
        None => Ok(PeriodKind::Month),
        Some(token) => PeriodKind::parse(token).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{token}` is not a period; use week, month, or year"
            ))
        }),
    }
}

fn parse_account_kind(raw: &str) -> Result<AccountKind, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "cash" => Ok(AccountKind::Cash),
        "bank" => Ok(AccountKind::Bank),
        "credit-card" | "credit_card" | "credit" => Ok(AccountKind::CreditCard),
        "digital-wallet" | "digital_wallet" | "wallet" => Ok(AccountKind::DigitalWallet),
        "investment" => Ok(AccountKind::Investment),
        "other" => Ok(AccountKind::Other),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not an account kind"
        ))),
    }
}

fn parse_plan_kind(raw: &str) -> Result<PlanKind, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "trip" => Ok(PlanKind::Trip),
        "event" => Ok(PlanKind::Event),
        "goal" => Ok(PlanKind::Goal),
        "project" => Ok(PlanKind::Project),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not a plan kind; use trip, event, goal, or project"
        ))),
    }
}

/// Case-insensitive account lookup by name.
fn find_account(ledger: &Ledger, name: &str) -> Result<(RecordId, String), CommandError> {
    ledger
        .accounts
        .iter()
        .find(|account| account.name.eq_ignore_ascii_case(name))
        .map(|account| (account.id, account.name.clone()))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "no account named `{name}`; `account list` shows them"
            ))
        })
}

/// Case-insensitive category lookup, optionally narrowed to one side.
fn find_category(
    ledger: &Ledger,
    name: &str,
    kind: Option<CategoryKind>,
) -> Result<(RecordId, String), CommandError> {
    ledger
        .categories
        .iter()
        .filter(|category| kind.map_or(true, |k| category.kind == k))
        .find(|category| category.name.eq_ignore_ascii_case(name))
        .map(|category| (category.id, category.name.clone()))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "no category named `{name}`; `category list` shows them"
            ))
        })
}
