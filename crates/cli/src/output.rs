//! Terminal rendering.

use prettytable::{Table, row};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io::Write;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use traderobots_domain::entities::{Disclosure, Robot, TradingAccount};
use traderobots_execution::export::{Clipboard, ExportError};
use traderobots_execution::progress::PROGRESS_DONE;

use crate::commands::Check;

/// Clipboard that prints to stdout.
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

pub fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Redraws a progress line on stderr until 100 is published.
pub fn render_progress(mut receiver: watch::Receiver<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let value = *receiver.borrow_and_update();
            eprint!("\r⏳ Synthesizing strategy... {value:>3}%");
            if value >= PROGRESS_DONE {
                break;
            }
        }
    })
}

pub fn print_dialog(dialog: &Disclosure) {
    eprintln!("⚠️  {}", dialog.title);
    eprintln!("   {}", dialog.message);
}

pub fn print_robot(robot: &Robot) {
    println!("════════════════════════════════════");
    println!("ID:        {}", robot.id);
    if let Some(name) = &robot.name {
        println!("Name:      {name}");
    }
    println!("Symbol:    {}", robot.symbol);
    println!("Method:    {}", robot.method);
    println!("Win rate:  {:.1}%", robot.win_rate);
    if !robot.indicators.is_empty() {
        println!("Signals:   {}", join(&robot.indicators));
    }
    let code = robot
        .mql5()
        .map_or_else(|| "not generated".to_string(), |code| format!("{} lines", code.lines().count()));
    println!("MQL5:      {code}");
    println!("════════════════════════════════════");
}

pub fn robots_table(robots: &[Robot]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["ID", "Name", "Symbol", "Method", "Win rate", "Author", "Created"]);
    for robot in robots {
        let created = robot
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        table.add_row(row![
            robot.id,
            robot.name.as_deref().unwrap_or("-"),
            robot.symbol,
            robot.method,
            format!("{:.1}%", robot.win_rate),
            robot.user_name.as_deref().unwrap_or("-"),
            created
        ]);
    }
    table
}

pub fn accounts_table(accounts: &[TradingAccount]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["ID", "Broker", "Login", "Server", "Mode", "Balance", "Equity"]);
    for account in accounts {
        let money = |value: Option<Decimal>| {
            value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
        };
        let mode = if account.is_demo { "demo" } else { "live" };
        table.add_row(row![
            account.id,
            account.broker,
            account.mt5_login,
            account.mt5_server,
            mode,
            money(account.balance),
            money(account.equity)
        ]);
    }
    table
}

pub fn smoke_table(base_url: &str, checks: &[(&str, Check)]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Check", "Result", base_url]);
    for (name, check) in checks {
        let (status, detail) = match check {
            Check::Passed(detail) => ("✅ ok", detail.clone()),
            Check::AuthRequired => ("🔒 ok", "authentication required".to_string()),
            Check::Failed(reason) => ("❌ failed", reason.clone()),
        };
        table.add_row(row![name, status, detail]);
    }
    table
}
