use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    account::AccountError,
    amount::Amount,
    ledger::{AccountId, Ledger, LedgerError},
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error(transparent)]
    LedgerErr(#[from] LedgerError),
    #[error("Transaction has already been executed")]
    AlreadyExecuted,
}

impl TransactionError {
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::AccountErr(AccountError::InsufficientFunds))
    }
}

/// Lifecycle of a single command: `Created -> Executed -> Undone`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandState {
    #[default]
    Created,
    Executed,
    Undone,
}

impl CommandState {
    fn ensure_created(&self) -> Result<(), TransactionError> {
        match self {
            CommandState::Created => Ok(()),
            CommandState::Executed | CommandState::Undone => {
                Err(TransactionError::AlreadyExecuted)
            }
        }
    }

    /// Moves `Executed` to `Undone`; returns false for any other state.
    fn begin_undo(&mut self) -> bool {
        if *self == CommandState::Executed {
            *self = CommandState::Undone;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepositCommand {
    account: AccountId,
    amount: Amount,
    state: CommandState,
}

impl DepositCommand {
    pub fn new(account: AccountId, amount: Amount) -> Self {
        Self {
            account,
            amount,
            state: CommandState::Created,
        }
    }

    pub fn execute(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        self.state.ensure_created()?;
        ledger.account_mut(self.account)?.credit(self.amount)?;
        self.state = CommandState::Executed;
        Ok(())
    }

    /// Debits the deposited amount back. When the account no longer holds it
    /// the balance is left as is and insufficient funds is returned; the
    /// command counts as undone either way.
    pub fn undo(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        if !self.state.begin_undo() {
            return Ok(());
        }
        ledger.account_mut(self.account)?.debit(self.amount)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WithdrawCommand {
    account: AccountId,
    amount: Amount,
    state: CommandState,
    succeeded: bool,
}

impl WithdrawCommand {
    pub fn new(account: AccountId, amount: Amount) -> Self {
        Self {
            account,
            amount,
            state: CommandState::Created,
            succeeded: false,
        }
    }

    /// Whether the debit went through. Always false before execution.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn execute(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        self.state.ensure_created()?;
        let outcome = ledger.account_mut(self.account)?.debit(self.amount);
        self.state = CommandState::Executed;
        self.succeeded = outcome.is_ok();
        Ok(outcome?)
    }

    /// Credits the amount back only if the withdrawal actually happened.
    pub fn undo(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        if !self.state.begin_undo() || !self.succeeded {
            return Ok(());
        }
        ledger.account_mut(self.account)?.credit(self.amount)?;
        Ok(())
    }
}

/// Withdraw from `source` followed by a deposit to `destination`.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    withdraw: WithdrawCommand,
    deposit: DepositCommand,
    state: CommandState,
}

impl TransferCommand {
    pub fn new(source: AccountId, destination: AccountId, amount: Amount) -> Self {
        Self {
            withdraw: WithdrawCommand::new(source, amount),
            deposit: DepositCommand::new(destination, amount),
            state: CommandState::Created,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.withdraw.succeeded() && self.deposit.state == CommandState::Executed
    }

    /// The deposit leg runs only when the withdraw leg succeeded. If the
    /// destination cannot take the money, the source is credited back.
    pub fn execute(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        self.state.ensure_created()?;
        // both ends must exist before any money moves
        ledger.account(self.withdraw.account)?;
        ledger.account(self.deposit.account)?;

        self.state = CommandState::Executed;
        self.withdraw.execute(ledger)?;
        if let Err(err) = self.deposit.execute(ledger) {
            self.withdraw.undo(ledger)?;
            return Err(err);
        }
        Ok(())
    }

    /// Reverses the deposit leg, then the withdraw leg. If the destination
    /// cannot give the money back, the source is not credited.
    pub fn undo(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        if !self.state.begin_undo() {
            return Ok(());
        }
        self.deposit.undo(ledger)?;
        self.withdraw.undo(ledger)
    }
}

#[derive(Debug, Clone)]
pub enum TransactionCommand {
    Deposit(DepositCommand),
    Withdraw(WithdrawCommand),
    Transfer(TransferCommand),
}

impl TransactionCommand {
    pub fn deposit(account: AccountId, amount: Amount) -> Self {
        Self::Deposit(DepositCommand::new(account, amount))
    }

    pub fn withdraw(account: AccountId, amount: Amount) -> Self {
        Self::Withdraw(WithdrawCommand::new(account, amount))
    }

    pub fn transfer(source: AccountId, destination: AccountId, amount: Amount) -> Self {
        Self::Transfer(TransferCommand::new(source, destination, amount))
    }

    pub fn state(&self) -> CommandState {
        match self {
            Self::Deposit(cmd) => cmd.state,
            Self::Withdraw(cmd) => cmd.state,
            Self::Transfer(cmd) => cmd.state,
        }
    }

    /// Whether undoing now would actually move money back.
    fn has_effect(&self) -> bool {
        match self {
            Self::Deposit(cmd) => cmd.state == CommandState::Executed,
            Self::Withdraw(cmd) => cmd.state == CommandState::Executed && cmd.succeeded(),
            Self::Transfer(cmd) => cmd.state == CommandState::Executed && cmd.succeeded(),
        }
    }

    pub fn execute(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        let result = match self {
            Self::Deposit(cmd) => cmd.execute(ledger),
            Self::Withdraw(cmd) => cmd.execute(ledger),
            Self::Transfer(cmd) => cmd.execute(ledger),
        };
        match &result {
            Ok(()) => info!("Executed {self}"),
            Err(err) => warn!("Failed to execute {self}: {err}"),
        }
        result
    }

    pub fn undo(&mut self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        let had_effect = self.has_effect();
        let result = match self {
            Self::Deposit(cmd) => cmd.undo(ledger),
            Self::Withdraw(cmd) => cmd.undo(ledger),
            Self::Transfer(cmd) => cmd.undo(ledger),
        };
        match &result {
            Ok(()) if had_effect => info!("Reversed {self}"),
            Ok(()) => info!("Skipped undo of {self}, it had no effect"),
            Err(err) => warn!("Failed to reverse {self}: {err}"),
        }
        result
    }
}

impl fmt::Display for TransactionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit(cmd) => write!(f, "deposit of {} to {}", cmd.amount, cmd.account),
            Self::Withdraw(cmd) => {
                write!(f, "withdrawal of {} from {}", cmd.amount, cmd.account)
            }
            Self::Transfer(cmd) => write!(
                f,
                "transfer of {} from {} to {}",
                cmd.withdraw.amount, cmd.withdraw.account, cmd.deposit.account
            ),
        }
    }
}
