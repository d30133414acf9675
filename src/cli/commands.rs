use std::sync::Arc;

use crate::cli::output;
use crate::currency::{self, CurrencyFormat};
use crate::errors::LedgerResult;
use crate::ledger::{Account, TransactionKind};
use crate::registry::Registry;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Shell state: the registry under management plus display preferences.
pub struct ShellContext {
    registry: Registry,
    format: CurrencyFormat,
}

impl ShellContext {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            format: CurrencyFormat::default(),
        }
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> LoopControl {
        match command {
            "open" | "add" | "register" => self.open(args),
            "use" | "select" => self.select(args),
            "deposit" => self.deposit(args),
            "withdraw" => self.withdraw(args),
            "balance" => self.balance(args),
            "info" => self.info(args),
            "accounts" | "list" => self.list(),
            "history" => self.history(args),
            "help" => help(),
            "exit" | "quit" => return LoopControl::Exit,
            other => output::warning(format!("Unknown command `{other}`. Type `help`.")),
        }
        LoopControl::Continue
    }

    fn open(&mut self, args: &[&str]) {
        let (name, number) = match args {
            [name, number] => (*name, *number),
            _ => {
                output::warning("Usage: open <holder-name> <account-number>");
                return;
            }
        };
        match self.registry.register(name, number) {
            Ok(account) => output::success(format!("Account {} opened.", account.display_name())),
            Err(err) => output::error(err),
        }
    }

    fn select(&mut self, args: &[&str]) {
        let number = match args {
            [number] => *number,
            _ => {
                output::warning("Usage: use <account-number>");
                return;
            }
        };
        match self.registry.select(number) {
            Ok(account) => output::info(format!("Switched to {}.", account.display_name())),
            Err(err) => output::error(err),
        }
    }

    fn deposit(&mut self, args: &[&str]) {
        let Some((amount, account)) = self.amount_and_target(args, "deposit") else {
            return;
        };
        let parsed = match currency::parse_amount(amount) {
            Ok(parsed) => parsed,
            Err(err) => {
                output::error(err);
                return;
            }
        };
        match self.registry.deposit(account.account_number(), amount) {
            Ok(balance) => output::success(format!(
                "Deposited {}. New balance: {}",
                currency::format_amount(parsed, &self.format),
                currency::format_amount(balance, &self.format)
            )),
            Err(err) => output::error(err),
        }
    }

    fn withdraw(&mut self, args: &[&str]) {
        let Some((amount, account)) = self.amount_and_target(args, "withdraw") else {
            return;
        };
        let parsed = match currency::parse_amount(amount) {
            Ok(parsed) => parsed,
            Err(err) => {
                output::error(err);
                return;
            }
        };
        match self.registry.withdraw(account.account_number(), amount) {
            Ok(balance) => output::success(format!(
                "Withdrew {}. New balance: {}",
                currency::format_amount(parsed, &self.format),
                currency::format_amount(balance, &self.format)
            )),
            Err(err) => output::error(err),
        }
    }

    fn balance(&mut self, args: &[&str]) {
        let Some(account) = self.target(args.first().copied()) else {
            return;
        };
        output::info(format!(
            "Balance: {}",
            currency::format_amount(account.balance(), &self.format)
        ));
    }

    fn info(&mut self, args: &[&str]) {
        let Some(account) = self.target(args.first().copied()) else {
            return;
        };
        output::info(format!(
            "Account Holder: {}\nAccount No: {}\nCurrent Balance: {}",
            account.holder_name(),
            account.account_number(),
            currency::format_amount(account.balance(), &self.format)
        ));
    }

    fn list(&self) {
        let listing = self.registry.list();
        if listing.is_empty() {
            output::info("No accounts registered yet.");
            return;
        }
        for summary in listing {
            println!("  {}", summary.display_name);
        }
    }

    fn history(&mut self, args: &[&str]) {
        let json = args.contains(&"--json");
        let number = args.iter().find(|arg| !arg.starts_with("--")).copied();
        let Some(account) = self.target(number) else {
            return;
        };
        let history = account.history();

        if json {
            match serde_json::to_string_pretty(&history) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => output::error(format!("Could not render history: {err}")),
            }
            return;
        }

        for entry in history {
            let amount = match entry.kind {
                TransactionKind::AccountCreated => "-".to_string(),
                _ => currency::format_amount(entry.signed_amount, &self.format),
            };
            println!(
                "  {} | {:<15} | {:>15} | {}",
                entry.timestamp.format("%d %b %Y, %I:%M %p"),
                entry.kind.label(),
                amount,
                currency::format_amount(entry.resulting_balance, &self.format)
            );
        }
    }

    /// Resolves the explicit account number or falls back to the active one.
    fn target(&self, number: Option<&str>) -> Option<Arc<Account>> {
        let found: LedgerResult<Arc<Account>> = match number {
            Some(number) => self.registry.account(number),
            None => {
                let Some(active) = self.registry.active() else {
                    output::error("No account selected. Open an account first.");
                    return None;
                };
                Ok(active)
            }
        };
        match found {
            Ok(account) => Some(account),
            Err(err) => {
                output::error(err);
                None
            }
        }
    }

    fn amount_and_target<'a>(&self, args: &[&'a str], verb: &str) -> Option<(&'a str, Arc<Account>)> {
        match args {
            [amount] => self.target(None).map(|account| (*amount, account)),
            [amount, number] => self.target(Some(*number)).map(|account| (*amount, account)),
            _ => {
                output::warning(format!("Usage: {verb} <amount> [account-number]"));
                None
            }
        }
    }
}

impl Default for ShellContext {
    fn default() -> Self {
        Self::new()
    }
}

fn help() {
    output::info("Commands:");
    println!("  open <name> <number>        Register a new account (aliases: add, register)");
    println!("  use <number>                Switch the active account (alias: select)");
    println!("  deposit <amount> [number]   Deposit into the active or named account");
    println!("  withdraw <amount> [number]  Withdraw from the active or named account");
    println!("  balance [number]            Show the current balance");
    println!("  info [number]               Show holder, number, and balance");
    println!("  accounts                    List all accounts (alias: list)");
    println!("  history [number] [--json]   Show the transaction log");
    println!("  exit                        Leave the shell (alias: quit)");
}
