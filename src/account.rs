use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::amount::Amount;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Balance would exceed the largest representable amount")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    owner: String,
    balance: Decimal,
}

impl Account {
    pub fn new(owner: impl Into<String>, initial_balance: Amount) -> Self {
        Self {
            owner: owner.into(),
            balance: initial_balance.value(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Leaves the balance untouched when the sum is not representable.
    pub fn credit(&mut self, amount: Amount) -> Result<(), AccountError> {
        self.balance = self
            .balance
            .checked_add(amount.value())
            .ok_or(AccountError::Overflow)?;
        debug!(owner = %self.owner, %amount, balance = %self.balance, "credited");
        Ok(())
    }

    /// Leaves the balance untouched when it does not cover `amount`.
    pub fn debit(&mut self, amount: Amount) -> Result<(), AccountError> {
        if self.balance >= amount.value() {
            self.balance -= amount.value();
            debug!(owner = %self.owner, %amount, balance = %self.balance, "debited");
            Ok(())
        } else {
            Err(AccountError::InsufficientFunds)
        }
    }
}
