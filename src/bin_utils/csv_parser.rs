use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptAction {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    Undo,
}

#[derive(Debug, Deserialize)]
pub struct ScriptRow {
    #[serde(rename = "type")]
    pub action: ScriptAction,
    pub account: Option<String>,
    pub to: Option<String>,
    pub amount: Option<Decimal>,
}

/// Parses a list of ledger operations in CSV format, yielding each row with
/// the line it starts on.
pub struct CsvScriptParser<R> {
    iter: DeserializeRecordsIntoIter<R, ScriptRow>,
}

impl<R> CsvScriptParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvScriptParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<ScriptRow>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rows() {
        let input = "type, account, to, amount\n\
                     open, john, , 1000\n\
                     transfer, john, jane, 2.5\n\
                     undo,,,\n\
                     undo\n\
                     bogus, john, , 1\n";
        let rows: Vec<_> = CsvScriptParser::new(input.as_bytes()).collect();
        assert_eq!(rows.len(), 5);

        let (line, open) = &rows[0];
        assert_eq!(*line, 2);
        let open = open.as_ref().unwrap();
        assert_eq!(open.action, ScriptAction::Open);
        assert_eq!(open.account.as_deref(), Some("john"));
        assert_eq!(open.to, None);
        assert_eq!(open.amount, Some(Decimal::from(1000)));

        assert_eq!(rows[1].0, 3);
        let transfer = rows[1].1.as_ref().unwrap();
        assert_eq!(transfer.action, ScriptAction::Transfer);
        assert_eq!(transfer.to.as_deref(), Some("jane"));
        assert_eq!(transfer.amount, Some(Decimal::new(25, 1)));

        for (_, undo) in &rows[2..4] {
            let undo = undo.as_ref().unwrap();
            assert_eq!(undo.action, ScriptAction::Undo);
            assert_eq!(undo.account, None);
            assert_eq!(undo.amount, None);
        }

        assert!(rows[4].1.is_err());
    }
}
