use std::io::Write;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::Ledger;

#[derive(Debug, Serialize)]
struct BalanceRow<'a> {
    account: &'a str,
    balance: Decimal,
}

/// Writes one `account,balance` row per account, in opening order.
pub fn print_balances<W: Write>(output: &mut W, ledger: &Ledger) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    for (id, acc) in ledger.accounts() {
        writer
            .serialize(BalanceRow {
                account: acc.owner(),
                balance: acc.balance(),
            })
            .with_context(|| format!("Failed to write balance of account {id}"))?;
    }
    writer.flush().context("Failed to flush balances")?;
    Ok(())
}
