use std::sync::{Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use crate::currency;
use crate::errors::{LedgerError, LedgerResult};

use super::transaction::{Transaction, TransactionKind};

#[derive(Debug)]
struct AccountState {
    balance: Decimal,
    history: Vec<Transaction>,
}

/// One bank account: holder identity plus balance and append-only history.
///
/// Identity fields are immutable. Balance and history live behind a single
/// mutex, so a shared `Arc<Account>` can be mutated from several threads
/// while the balance invariant holds: the balance always equals the sum of
/// the signed amounts in the history, and never goes negative.
#[derive(Debug)]
pub struct Account {
    holder_name: String,
    account_number: String,
    state: Mutex<AccountState>,
}

impl Account {
    /// Creates the account at balance 0.00 and records the creation entry.
    pub(crate) fn new(holder_name: impl Into<String>, account_number: impl Into<String>) -> Self {
        let creation = Transaction::new(TransactionKind::AccountCreated, Decimal::ZERO, Decimal::ZERO);
        Self {
            holder_name: holder_name.into(),
            account_number: account_number.into(),
            state: Mutex::new(AccountState {
                balance: Decimal::ZERO,
                history: vec![creation],
            }),
        }
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Label used by presentation layers, e.g. `Asha (AC100)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.holder_name, self.account_number)
    }

    /// Adds `amount` to the balance and appends a deposit entry.
    ///
    /// Returns the new balance. The amount is normalized to scale 2 and must
    /// be positive after rounding.
    pub fn deposit(&self, amount: Decimal) -> LedgerResult<Decimal> {
        let amount = Self::validated(amount)?;
        let mut state = self.state();
        state.balance += amount;
        let balance = state.balance;
        state
            .history
            .push(Transaction::new(TransactionKind::Deposit, amount, balance));
        tracing::debug!(account = %self.account_number, %amount, %balance, "deposit applied");
        Ok(balance)
    }

    /// Subtracts `amount` from the balance and appends a withdrawal entry.
    ///
    /// Rejects the operation with `InsufficientFunds` when `amount` exceeds
    /// the current balance; balance and history are left untouched and no
    /// declined-attempt record is written.
    pub fn withdraw(&self, amount: Decimal) -> LedgerResult<Decimal> {
        let amount = Self::validated(amount)?;
        let mut state = self.state();
        if amount > state.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: state.balance,
            });
        }
        state.balance -= amount;
        let balance = state.balance;
        state
            .history
            .push(Transaction::new(TransactionKind::Withdraw, -amount, balance));
        tracing::debug!(account = %self.account_number, %amount, %balance, "withdrawal applied");
        Ok(balance)
    }

    pub fn balance(&self) -> Decimal {
        self.state().balance
    }

    /// Snapshot of the full history, oldest first.
    pub fn history(&self) -> Vec<Transaction> {
        self.state().history.clone()
    }

    fn validated(amount: Decimal) -> LedgerResult<Decimal> {
        let amount = currency::normalize(amount);
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount("amount must be positive".into()));
        }
        Ok(amount)
    }

    // Balance and history are only ever updated together under one guard, so
    // a poisoned lock still holds a consistent state and can be recovered.
    fn state(&self) -> MutexGuard<'_, AccountState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_account_records_creation_entry() {
        let account = Account::new("Asha", "AC100");
        assert_eq!(account.balance(), Decimal::ZERO);
        let history = account.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::AccountCreated);
        assert_eq!(history[0].signed_amount, Decimal::ZERO);
        assert_eq!(history[0].resulting_balance, Decimal::ZERO);
    }

    #[test]
    fn deposit_updates_balance_and_history() {
        let account = Account::new("Asha", "AC100");
        let balance = account.deposit(dec!(500.00)).expect("deposit");
        assert_eq!(balance, dec!(500.00));
        let history = account.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].kind, TransactionKind::Deposit);
        assert_eq!(history[1].signed_amount, dec!(500.00));
        assert_eq!(history[1].resulting_balance, dec!(500.00));
    }

    #[test]
    fn withdraw_rejects_overdraft_without_mutation() {
        let account = Account::new("Asha", "AC100");
        account.deposit(dec!(500.00)).unwrap();
        let err = account.withdraw(dec!(600.00)).expect_err("overdraft");
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                requested: dec!(600.00),
                available: dec!(500.00),
            }
        );
        assert_eq!(account.balance(), dec!(500.00));
        assert_eq!(account.history().len(), 2);
    }

    #[test]
    fn withdraw_to_zero_succeeds() {
        let account = Account::new("Asha", "AC100");
        account.deposit(dec!(500.00)).unwrap();
        let balance = account.withdraw(dec!(500.00)).expect("withdraw");
        assert_eq!(balance, Decimal::ZERO);
        let history = account.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].signed_amount, dec!(-500.00));
        assert_eq!(history[2].resulting_balance, Decimal::ZERO);
    }

    #[test]
    fn non_positive_amounts_are_rejected_without_history_entries() {
        let account = Account::new("Asha", "AC100");
        for amount in [Decimal::ZERO, dec!(-10), dec!(0.004)] {
            assert!(matches!(
                account.deposit(amount),
                Err(LedgerError::InvalidAmount(_))
            ));
            assert!(matches!(
                account.withdraw(amount),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
        assert_eq!(account.history().len(), 1);
    }

    #[test]
    fn amounts_round_half_up_on_entry() {
        let account = Account::new("Asha", "AC100");
        let balance = account.deposit(dec!(10.005)).expect("deposit");
        assert_eq!(balance, dec!(10.01));
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let account = Account::new("Asha", "AC100");
        account.deposit(dec!(1)).unwrap();
        account.deposit(dec!(2)).unwrap();
        account.withdraw(dec!(1)).unwrap();
        let history = account.history();
        for pair in history.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }
}
