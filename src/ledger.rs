use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::{account::Account, amount::Amount};

/// Handle to an [`Account`] stored in a [`Ledger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(usize);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account {0} does not exist")]
    UnknownAccount(AccountId),
    #[error("Account for `{0}` is already open")]
    DuplicateOwner(String),
}

/// Owns every account. Accounts are never removed, so an [`AccountId`]
/// handed out by a ledger stays valid for as long as that ledger lives.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: Vec<Account>,
}

impl Ledger {
    pub fn open(
        &mut self,
        owner: impl Into<String>,
        initial_balance: Amount,
    ) -> Result<AccountId, LedgerError> {
        let owner = owner.into();
        if self.find(&owner).is_some() {
            return Err(LedgerError::DuplicateOwner(owner));
        }
        let id = AccountId(self.accounts.len());
        debug!(%id, %owner, %initial_balance, "account opened");
        self.accounts.push(Account::new(owner, initial_balance));
        Ok(id)
    }

    pub fn find(&self, owner: &str) -> Option<AccountId> {
        self.accounts
            .iter()
            .position(|acc| acc.owner() == owner)
            .map(AccountId)
    }

    pub fn account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get(id.0)
            .ok_or(LedgerError::UnknownAccount(id))
    }

    pub fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id.0)
            .ok_or(LedgerError::UnknownAccount(id))
    }

    /// Accounts in the order they were opened.
    pub fn accounts(&self) -> impl Iterator<Item = (AccountId, &Account)> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(idx, acc)| (AccountId(idx), acc))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
