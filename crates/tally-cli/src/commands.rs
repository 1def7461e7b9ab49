use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tempfile::NamedTempFile;
use tracing::debug;
use tally_sdk::{
    Balance, Expense, FindingKind, Identity, NewExpense, Person, Tally, TallyConfig,
    TallySnapshot,
};

use crate::cli::*;

#[derive(Serialize)]
struct BalanceRow {
    identity: Identity,
    balance: Balance,
}

#[derive(Serialize)]
struct BalanceReport {
    balances: Vec<BalanceRow>,
    total: Balance,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let output = cli.format;
    if let Command::NewIdentity = cli.command {
        return cmd_new_identity(output);
    }

    let config = match &cli.config {
        Some(path) => TallyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TallyConfig::default(),
    };
    let tally = load_state(&cli.state, config)?;

    match cli.command {
        Command::Register(args) => {
            let person = tally.register(args.identity, &args.name)?;
            save_state(&cli.state, &tally)?;
            emit(output, &person, || {
                println!("{} Registered {} as {}", "✓".green().bold(), person.identity.to_string().cyan(), person.name.bold());
            })
        }
        Command::Rename(args) => {
            let person = tally.update_name(&args.identity, &args.name)?;
            save_state(&cli.state, &tally)?;
            emit(output, &person, || {
                println!("{} {} is now {}", "✓".green().bold(), person.identity.to_string().cyan(), person.name.bold());
            })
        }
        Command::Whois(args) => {
            let person = tally.lookup(&args.identity);
            emit(output, &person, || print_person(&person))
        }
        Command::People => {
            let people = tally.people();
            emit(output, &people, || {
                if people.is_empty() {
                    println!("No one registered.");
                }
                for person in &people {
                    print_person(person);
                }
            })
        }
        Command::Add(args) => {
            let input = args.shares.iter().fold(NewExpense::labelled(args.label), |acc, s| {
                acc.share(s.identity, s.paid, s.owed)
            });
            let id = tally.add_expense(&input)?;
            save_state(&cli.state, &tally)?;
            emit(output, &json!({ "id": id }), || {
                println!("{} Expense {} recorded: {}", "✓".green().bold(), format!("#{id}").yellow(), input.label);
            })
        }
        Command::Show(args) => {
            let expense = tally.expense(args.id)?;
            emit(output, &expense, || print_expense(&tally, &expense))
        }
        Command::Last => {
            let label = tally.last_label()?;
            emit(output, &json!({ "label": label }), || println!("{label}"))
        }
        Command::List => {
            let expenses = tally.expenses();
            emit(output, &expenses, || {
                if expenses.is_empty() {
                    println!("No expenses.");
                }
                for expense in &expenses {
                    println!(
                        "{}  {}  {}  ({} participants, {} paid)",
                        format!("#{}", expense.id).yellow(),
                        expense.timestamp.to_string().dimmed(),
                        expense.label,
                        expense.participants.len(),
                        expense.total_paid(),
                    );
                }
            })
        }
        Command::Balance(args) => {
            let balance = tally.net_balance(&args.identity);
            emit(
                output,
                &BalanceRow { identity: args.identity, balance },
                || println!("{}  {}", name_of(&tally, &args.identity), colored_balance(balance)),
            )
        }
        Command::Balances => {
            let sheet = tally.balance_sheet();
            let rows: Vec<_> = sheet
                .iter()
                .map(|(&identity, &balance)| BalanceRow { identity, balance })
                .collect();
            let report = BalanceReport { balances: rows, total: sheet.total() };
            emit(output, &report, || {
                if sheet.is_empty() {
                    println!("No balances.");
                    return;
                }
                for (identity, balance) in sheet.creditors().into_iter().chain(sheet.debtors()) {
                    println!("{:<24} {}", name_of(&tally, &identity), colored_balance(balance));
                }
                if sheet.total() != 0 {
                    println!("{} balances sum to {}", "!".yellow().bold(), sheet.total());
                }
            })
        }
        Command::Settle(args) => {
            let record = tally.record_settlement(args.payer, args.payee, args.amount)?;
            emit(output, &record, || {
                println!(
                    "{} {} settled {} with {} (event {})",
                    "✓".green().bold(),
                    name_of(&tally, &args.payer),
                    args.amount.to_string().bold(),
                    name_of(&tally, &args.payee),
                    record.short_hash().dimmed(),
                );
            })
        }
        Command::Audit => {
            let report = tally.audit();
            emit(output, &report, || {
                if report.is_clean() {
                    println!("{} {} expenses, no findings", "✓".green().bold(), report.expense_count);
                    return;
                }
                for finding in &report.findings {
                    let what = match &finding.kind {
                        FindingKind::Unbalanced { paid, owed } => {
                            format!("paid {paid} but owed {owed}")
                        }
                        FindingKind::DuplicateParticipant { identity } => {
                            format!("{identity} listed more than once")
                        }
                        FindingKind::UnregisteredParticipant { identity } => {
                            format!("{identity} is not registered")
                        }
                    };
                    println!("{} {} {}", "!".yellow().bold(), format!("#{}", finding.expense_id).yellow(), what);
                }
            })
        }
        Command::NewIdentity => cmd_new_identity(output),
    }
}

fn cmd_new_identity(output: OutputFormat) -> anyhow::Result<()> {
    let identity = Identity::random();
    emit(output, &json!({ "identity": identity }), || println!("{identity}"))
}

/// Open the state file, or start empty if it does not exist yet.
pub fn load_state(path: &Path, config: TallyConfig) -> anyhow::Result<Tally> {
    if !path.exists() {
        return Ok(Tally::new(config));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading state {}", path.display()))?;
    let snapshot = TallySnapshot::from_json(&text)
        .with_context(|| format!("parsing state {}", path.display()))?;
    debug!(path = %path.display(), "state loaded");
    Ok(Tally::restore(snapshot, config)?)
}

/// Replace the state file atomically: write a sibling temp file, then rename
/// it over the old one.
pub fn save_state(path: &Path, tally: &Tally) -> anyhow::Result<()> {
    let json = tally.snapshot().to_json()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("writing state {}", path.display()))?;
    debug!(path = %path.display(), "state saved");
    Ok(())
}

fn emit<T: Serialize + ?Sized>(
    output: OutputFormat,
    value: &T,
    text: impl FnOnce(),
) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn print_person(person: &Person) {
    if person.is_registered {
        println!("{}  {}", person.identity.to_string().cyan(), person.name.bold());
    } else {
        println!("{}  {}", person.identity.to_string().cyan(), "(not registered)".dimmed());
    }
}

fn print_expense(tally: &Tally, expense: &Expense) {
    println!("Expense {}: {}", format!("#{}", expense.id).yellow().bold(), expense.label);
    println!("  Recorded: {}", expense.timestamp);
    for identity in &expense.participants {
        println!(
            "  {:<24} paid {:>8}  owes {:>8}",
            name_of(tally, identity),
            expense.paid_by(identity),
            expense.owed_by(identity),
        );
    }
}

fn name_of(tally: &Tally, identity: &Identity) -> String {
    let person = tally.lookup(identity);
    if person.is_registered {
        person.name
    } else {
        identity.short_id()
    }
}

fn colored_balance(balance: Balance) -> String {
    match balance {
        b if b > 0 => format!("+{b}").green().to_string(),
        b if b < 0 => b.to_string().red().to_string(),
        _ => "0".to_string(),
    }
}
