use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use bson::Bson;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;
use thousands::Separable;

use crate::eval::{self, ErrorKind, EvalFunc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Stop at the first failing row.
    #[default]
    Fail,
    /// Count the failure and drop the row from the output.
    Skip,
    /// Count the failure, log it, and emit a null for the row.
    Log,
}

#[derive(Debug, Error)]
#[error("{func} failed on row {row}")]
pub struct RowError {
    pub func: String,
    pub row: u64,
    #[source]
    pub source: eval::Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Value(T),
    Null,
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub rows: u64,
    pub values: u64,
    pub nulls: u64,
    pub skipped: u64,
    pub errors: BTreeMap<ErrorKind, u64>,
}

impl Counters {
    pub fn error_count(&self, kind: ErrorKind) -> u64 {
        self.errors.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_errors(&self) -> u64 {
        self.errors.values().sum()
    }
}

impl Display for Counters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows: {} values, {} nulls, {} skipped",
            self.rows.separate_with_commas(),
            self.values.separate_with_commas(),
            self.nulls.separate_with_commas(),
            self.skipped.separate_with_commas(),
        )?;
        for (kind, count) in &self.errors {
            write!(f, ", {:?}={}", kind, count.separate_with_commas())?;
        }
        Ok(())
    }
}

pub struct Batch<'f, F> {
    func: &'f F,
    policy: RowErrorPolicy,
    counters: Counters,
}

impl<'f, F: EvalFunc> Batch<'f, F> {
    pub fn new(func: &'f F, policy: RowErrorPolicy) -> Self {
        Self { func, policy, counters: Counters::default() }
    }

    pub fn eval(&mut self, input: Option<&[Bson]>) -> Result<Outcome<F::Output>, RowError> {
        self.counters.rows += 1;
        let err = match self.func.exec(input) {
            Ok(Some(value)) => {
                self.counters.values += 1;
                return Ok(Outcome::Value(value));
            }
            Ok(None) => {
                self.counters.nulls += 1;
                return Ok(Outcome::Null);
            }
            Err(err) => err,
        };

        *self.counters.errors.entry(err.kind()).or_insert(0) += 1;
        match self.policy {
            RowErrorPolicy::Fail => Err(RowError {
                func: self.func.name().to_owned(),
                row: self.counters.rows,
                source: err,
            }),
            RowErrorPolicy::Skip => {
                debug!("{}: skipping row {}: {}", self.func.name(), self.counters.rows, err);
                self.counters.skipped += 1;
                Ok(Outcome::Skipped)
            }
            RowErrorPolicy::Log => {
                warn!("{}: row {}: {}", self.func.name(), self.counters.rows, err);
                self.counters.nulls += 1;
                Ok(Outcome::Null)
            }
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn finish(self) -> Counters {
        self.counters
    }
}
