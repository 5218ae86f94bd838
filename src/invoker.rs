use tracing::debug;

use crate::{
    command::{TransactionCommand, TransactionError},
    ledger::Ledger,
};

/// Executes commands and keeps them in a last-in-first-out history so the
/// most recent one can be undone.
///
/// Every executed command is recorded, including those that reported an
/// error; undoing such an entry only reverses what the command actually did.
#[derive(Debug, Default)]
pub struct TransactionInvoker {
    history: Vec<TransactionCommand>,
}

impl TransactionInvoker {
    pub fn execute_command(
        &mut self,
        ledger: &mut Ledger,
        mut cmd: TransactionCommand,
    ) -> Result<(), TransactionError> {
        let result = cmd.execute(ledger);
        self.history.push(cmd);
        debug!(depth = self.history.len(), "command pushed to history");
        result
    }

    /// Pops the newest command and reverses it. Returns `Ok(None)` when the
    /// history is empty.
    pub fn undo_last(
        &mut self,
        ledger: &mut Ledger,
    ) -> Result<Option<TransactionCommand>, TransactionError> {
        let Some(mut cmd) = self.history.pop() else {
            debug!("nothing to undo");
            return Ok(None);
        };
        debug!(depth = self.history.len(), "command popped from history");
        cmd.undo(ledger)?;
        Ok(Some(cmd))
    }

    /// Oldest first.
    pub fn history(&self) -> &[TransactionCommand] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::{account::AccountError, amount::Amount, command::CommandState};

    use super::*;

    #[test]
    fn execute_and_undo_in_reverse_order() {
        let mut ledger = Ledger::default();
        let acc = ledger.open("john", Amount::from(1000)).unwrap();
        let mut invoker = TransactionInvoker::default();

        invoker
            .execute_command(&mut ledger, TransactionCommand::deposit(acc, Amount::from(200)))
            .unwrap();
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(1200));
        invoker
            .execute_command(&mut ledger, TransactionCommand::withdraw(acc, Amount::from(150)))
            .unwrap();
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(1050));

        let err = invoker
            .execute_command(&mut ledger, TransactionCommand::withdraw(acc, Amount::from(5000)))
            .unwrap_err();
        assert!(err.is_insufficient_funds());
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(1050));
        // failed attempts are recorded too
        assert_eq!(invoker.len(), 3);

        let undone = invoker.undo_last(&mut ledger).unwrap().unwrap();
        assert_eq!(undone.state(), CommandState::Undone);
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(1050));

        invoker.undo_last(&mut ledger).unwrap();
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(1200));

        invoker.undo_last(&mut ledger).unwrap();
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(1000));
        assert!(invoker.is_empty());
    }

    #[test]
    fn undo_on_empty_history() {
        let mut ledger = Ledger::default();
        let mut invoker = TransactionInvoker::default();
        assert!(invoker.undo_last(&mut ledger).unwrap().is_none());
        assert!(invoker.is_empty());
    }

    #[test]
    fn top_of_history_is_latest_command() {
        let mut ledger = Ledger::default();
        let john = ledger.open("john", Amount::from(100)).unwrap();
        let jane = ledger.open("jane", Amount::ZERO).unwrap();
        let mut invoker = TransactionInvoker::default();

        invoker
            .execute_command(&mut ledger, TransactionCommand::deposit(jane, Amount::from(1)))
            .unwrap();
        invoker
            .execute_command(
                &mut ledger,
                TransactionCommand::transfer(john, jane, Amount::from(40)),
            )
            .unwrap();

        let history = invoker.history();
        assert_eq!(history.len(), 2);
        assert!(matches!(history[1], TransactionCommand::Transfer(_)));
        assert!(history.iter().all(|cmd| cmd.state() == CommandState::Executed));

        let undone = invoker.undo_last(&mut ledger).unwrap().unwrap();
        assert!(matches!(undone, TransactionCommand::Transfer(_)));
        assert_eq!(ledger.account(john).unwrap().balance(), Decimal::from(100));
        assert_eq!(ledger.account(jane).unwrap().balance(), Decimal::from(1));
        assert_eq!(invoker.len(), 1);
    }

    #[test]
    fn undo_command_that_never_reached_an_account() {
        let mut ledger = Ledger::default();
        let acc = ledger.open("john", Amount::from(10)).unwrap();
        let mut other = Ledger::default();
        other.open("a", Amount::ZERO).unwrap();
        let stranger = other.open("b", Amount::ZERO).unwrap();
        let mut invoker = TransactionInvoker::default();

        let err = invoker
            .execute_command(&mut ledger, TransactionCommand::deposit(stranger, Amount::from(1)))
            .unwrap_err();
        assert!(matches!(err, TransactionError::LedgerErr(_)));
        assert_eq!(invoker.len(), 1);

        let undone = invoker.undo_last(&mut ledger).unwrap().unwrap();
        assert_eq!(undone.state(), CommandState::Created);
        assert!(invoker.is_empty());
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(10));
    }

    #[test]
    fn deposit_overflow_is_recorded_and_undone_as_no_op() {
        let mut ledger = Ledger::default();
        let acc = ledger.open("john", Amount::new(Decimal::MAX).unwrap()).unwrap();
        let mut invoker = TransactionInvoker::default();

        let err = invoker
            .execute_command(&mut ledger, TransactionCommand::deposit(acc, Amount::from(1)))
            .unwrap_err();
        assert_eq!(err, TransactionError::AccountErr(AccountError::Overflow));
        assert_eq!(invoker.len(), 1);

        invoker.undo_last(&mut ledger).unwrap();
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::MAX);
    }

    #[test]
    fn failed_reversal_still_pops_the_command() {
        let mut ledger = Ledger::default();
        let acc = ledger.open("john", Amount::ZERO).unwrap();
        let mut invoker = TransactionInvoker::default();

        invoker
            .execute_command(&mut ledger, TransactionCommand::deposit(acc, Amount::from(50)))
            .unwrap();
        ledger.account_mut(acc).unwrap().debit(Amount::from(20)).unwrap();

        let err = invoker.undo_last(&mut ledger).unwrap_err();
        assert!(err.is_insufficient_funds());
        assert!(invoker.is_empty());
        assert_eq!(ledger.account(acc).unwrap().balance(), Decimal::from(30));
    }
}
