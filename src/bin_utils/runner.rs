use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    amount::{Amount, AmountError},
    command::{TransactionCommand, TransactionError},
    invoker::TransactionInvoker,
    ledger::{AccountId, Ledger, LedgerError},
};

use super::csv_parser::{ScriptAction, ScriptRow};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error("Account is required for {action:?}")]
    AccountRequired { action: ScriptAction },
    #[error("Destination account is required for {action:?}")]
    DestinationRequired { action: ScriptAction },
    #[error("Amount is required for {action:?}")]
    AmountRequired { action: ScriptAction },
    #[error("No account is open for `{0}`")]
    UnknownOwner(String),
    #[error(transparent)]
    AmountErr(#[from] AmountError),
    #[error(transparent)]
    LedgerErr(#[from] LedgerError),
    #[error(transparent)]
    TransactionErr(#[from] TransactionError),
}

impl ScriptError {
    /// Insufficient funds is an expected business outcome rather than a
    /// problem with the script itself.
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::TransactionErr(err) if err.is_insufficient_funds())
    }
}

/// Applies script rows to a ledger through a [`TransactionInvoker`].
#[derive(Debug, Default)]
pub struct ScriptRunner {
    pub ledger: Ledger,
    pub invoker: TransactionInvoker,
}

impl ScriptRunner {
    pub fn apply(&mut self, row: ScriptRow) -> Result<(), ScriptError> {
        let action = row.action;
        match action {
            ScriptAction::Open => {
                let owner = row.account.ok_or(ScriptError::AccountRequired { action })?;
                let initial = Self::amount(action, row.amount)?;
                self.ledger.open(owner, initial)?;
            }
            ScriptAction::Deposit => {
                let account = self.resolve(action, row.account.as_deref())?;
                let amount = Self::amount(action, row.amount)?;
                self.invoker.execute_command(
                    &mut self.ledger,
                    TransactionCommand::deposit(account, amount),
                )?;
            }
            ScriptAction::Withdraw => {
                let account = self.resolve(action, row.account.as_deref())?;
                let amount = Self::amount(action, row.amount)?;
                self.invoker.execute_command(
                    &mut self.ledger,
                    TransactionCommand::withdraw(account, amount),
                )?;
            }
            ScriptAction::Transfer => {
                let source = self.resolve(action, row.account.as_deref())?;
                let destination = match row.to.as_deref() {
                    Some(owner) => self.lookup(owner)?,
                    None => return Err(ScriptError::DestinationRequired { action }),
                };
                let amount = Self::amount(action, row.amount)?;
                self.invoker.execute_command(
                    &mut self.ledger,
                    TransactionCommand::transfer(source, destination, amount),
                )?;
            }
            ScriptAction::Undo => {
                self.invoker.undo_last(&mut self.ledger)?;
            }
        }
        Ok(())
    }

    fn resolve(
        &self,
        action: ScriptAction,
        owner: Option<&str>,
    ) -> Result<AccountId, ScriptError> {
        let owner = owner.ok_or(ScriptError::AccountRequired { action })?;
        self.lookup(owner)
    }

    fn lookup(&self, owner: &str) -> Result<AccountId, ScriptError> {
        self.ledger
            .find(owner)
            .ok_or_else(|| ScriptError::UnknownOwner(owner.to_string()))
    }

    fn amount(action: ScriptAction, amount: Option<Decimal>) -> Result<Amount, ScriptError> {
        let amount = amount.ok_or(ScriptError::AmountRequired { action })?;
        Ok(Amount::new(amount)?)
    }
}
