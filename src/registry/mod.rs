use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{Account, Transaction};

/// One row of the account listing, in registration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    pub display_name: String,
    pub account_number: String,
}

#[derive(Debug, Default)]
struct RegistryInner {
    accounts: Vec<Arc<Account>>,
    active: Option<Arc<Account>>,
}

/// The keyed collection of all accounts plus the active-account pointer.
///
/// Account numbers are unique; insertion order is preserved for listings.
/// Registration and selection are serialized under one mutex, while each
/// account carries its own lock, so operations on different accounts run
/// concurrently.
///
/// The registry also exposes the string-amount call surface used by
/// presentation layers: amounts arrive as text, are parsed and rounded
/// half-up to two decimals, and are rejected with `InvalidAmount` before any
/// account is touched.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account and makes it the active one.
    ///
    /// Holder name and account number are trimmed and must be non-empty;
    /// a duplicate account number is rejected without side effects.
    pub fn register(&self, holder_name: &str, account_number: &str) -> LedgerResult<Arc<Account>> {
        let name = holder_name.trim();
        let number = account_number.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidInput("holder name is required".into()));
        }
        if number.is_empty() {
            return Err(LedgerError::InvalidInput("account number is required".into()));
        }

        let mut inner = self.guard();
        if inner
            .accounts
            .iter()
            .any(|account| account.account_number() == number)
        {
            return Err(LedgerError::DuplicateAccount(number.to_string()));
        }
        let account = Arc::new(Account::new(name, number));
        inner.accounts.push(Arc::clone(&account));
        inner.active = Some(Arc::clone(&account));
        tracing::info!(account = number, holder = name, "account registered");
        Ok(account)
    }

    /// Makes the named account active and returns it.
    pub fn select(&self, account_number: &str) -> LedgerResult<Arc<Account>> {
        let mut inner = self.guard();
        let account = Self::find(&inner, account_number)?;
        inner.active = Some(Arc::clone(&account));
        Ok(account)
    }

    /// Looks up an account without changing the active pointer.
    pub fn account(&self, account_number: &str) -> LedgerResult<Arc<Account>> {
        Self::find(&self.guard(), account_number)
    }

    /// The account currently targeted by the presentation layer, if any.
    pub fn active(&self) -> Option<Arc<Account>> {
        self.guard().active.clone()
    }

    /// All accounts in registration order.
    pub fn list(&self) -> Vec<AccountSummary> {
        self.guard()
            .accounts
            .iter()
            .map(|account| AccountSummary {
                display_name: account.display_name(),
                account_number: account.account_number().to_string(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.guard().accounts.len()
    }

    /// Parses `amount` and deposits it into the named account.
    pub fn deposit(&self, account_number: &str, amount: &str) -> LedgerResult<Decimal> {
        let amount = currency::parse_amount(amount)?;
        self.account(account_number)?.deposit(amount)
    }

    /// Parses `amount` and withdraws it from the named account.
    pub fn withdraw(&self, account_number: &str, amount: &str) -> LedgerResult<Decimal> {
        let amount = currency::parse_amount(amount)?;
        self.account(account_number)?.withdraw(amount)
    }

    pub fn balance(&self, account_number: &str) -> LedgerResult<Decimal> {
        Ok(self.account(account_number)?.balance())
    }

    pub fn history(&self, account_number: &str) -> LedgerResult<Vec<Transaction>> {
        Ok(self.account(account_number)?.history())
    }

    fn find(inner: &RegistryInner, account_number: &str) -> LedgerResult<Arc<Account>> {
        inner
            .accounts
            .iter()
            .find(|account| account.account_number() == account_number)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(account_number.to_string()))
    }

    fn guard(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
