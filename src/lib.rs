/// Validated, non-negative money amounts.
pub mod amount;

/// Single owner balance with the credit and debit primitives.
pub mod account;

/// Arena owning every account, addressed by [`ledger::AccountId`].
pub mod ledger;

/// Reversible deposit, withdraw and transfer commands.
/// Each command remembers the effect it actually caused, so undo reverses
/// exactly that and nothing more.
pub mod command;

/// Executes commands and keeps the undo history.
pub mod invoker;

/// Ideally, this module should exist in its own crate, as a way to
/// bootstrap core logic from a CSV script. However, I want to use it for
/// integration tests so I put it here.
pub mod bin_utils;
