//! This module could be a separate crate on its own, to bootstrap [`crate`] within binary
//! but for simplicity purposes, I include this module directly in the library.

use std::io::{Read, Write};

use anyhow::Result;
use csv_parser::CsvScriptParser;
use csv_printer::print_balances;
use runner::{ScriptError, ScriptRunner};

pub mod config;
pub mod csv_parser;
pub mod csv_printer;
pub mod runner;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, ScriptError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvScriptParser::new(self.input);

        let mut runner = ScriptRunner::default();

        for (line, row) in parser {
            let result = row
                .map_err(ScriptError::from)
                .and_then(|row| runner.apply(row));
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        print_balances(self.output, &runner.ledger)
    }
}
