use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kinds of entries recorded in an account's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    AccountCreated,
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::AccountCreated => "Account Created",
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
        }
    }
}

/// One immutable, timestamped record of a balance change or account creation.
///
/// `signed_amount` is zero for `AccountCreated`, positive for deposits, and
/// negative for withdrawals. `resulting_balance` snapshots the balance
/// immediately after the entry was applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub signed_amount: Decimal,
    pub resulting_balance: Decimal,
}

impl Transaction {
    pub(crate) fn new(kind: TransactionKind, signed_amount: Decimal, resulting_balance: Decimal) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            signed_amount,
            resulting_balance,
        }
    }
}
