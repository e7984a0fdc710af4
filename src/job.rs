use std::io::{BufRead, Write};

use log::info;
use thiserror::Error;

use crate::batch::{Batch, Counters, Outcome, RowError};
use crate::config::{JobConfig, OutputFormat};
use crate::eval::{EvalFunc, ProfileCreationTime, ProfileCreationTimestamp};
use crate::payload::{self, Records};
use crate::time::{Timestamp, TimestampFormat};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Payload(#[from] payload::Error),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error("error writing output")]
    IO(#[from] std::io::Error),
}

/// Converts every payload in `input`, writing one line per emitted row to `out`: the value,
/// or `null`, prefixed by `key<TAB>` when `with_key` is set and the record has a key.
pub fn run<R: BufRead, W: Write>(
    input: R,
    config: &JobConfig,
    with_key: bool,
    out: W,
) -> Result<Counters, Error> {
    match config.format {
        OutputFormat::Millis => run_with(
            &ProfileCreationTime,
            |millis: i64| millis.to_string(),
            input,
            config,
            with_key,
            out,
        ),
        OutputFormat::Rfc3339 => run_with(
            &ProfileCreationTimestamp,
            |ts: Timestamp| ts.to_timestamp_string(),
            input,
            config,
            with_key,
            out,
        ),
    }
}

fn run_with<F: EvalFunc, R: BufRead, W: Write>(
    func: &F,
    render: impl Fn(F::Output) -> String,
    input: R,
    config: &JobConfig,
    with_key: bool,
    mut out: W,
) -> Result<Counters, Error> {
    let mut batch = Batch::new(func, config.on_error);

    for record in Records::new(input) {
        let record = record?;
        let row = record.project(&config.fields);
        let value = match batch.eval(Some(row.as_slice()))? {
            Outcome::Value(value) => render(value),
            Outcome::Null => "null".to_owned(),
            Outcome::Skipped => continue,
        };
        match &record.key {
            Some(key) if with_key => writeln!(out, "{key}\t{value}")?,
            _ => writeln!(out, "{value}")?,
        }
    }
    out.flush()?;

    let counters = batch.finish();
    info!("{}: {}", func.name(), counters);
    Ok(counters)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::batch::RowErrorPolicy;
    use crate::eval::ErrorKind;

    use super::*;

    const INPUT: &str = concat!(
        "a\t{\"data\": {\"last\": {\"org.mozilla.profile.age\": {\"profileCreation\": 16000}}}}\n",
        "b\t{\"data\": {\"last\": {\"org.mozilla.profile.age\": {\"profileCreation\": 1000000000}}}}\n",
        "c\t{\"data\": {\"last\": {\"org.mozilla.profile.age\": {\"profileCreation\": \"x\"}}}}\n",
        "d\t{\"data\": {\"last\": {\"org.mozilla.profile.age\": {\"profileCreation\": 1}}}}\n",
        "e\t{\"data\": {}}\n",
    );

    fn config(on_error: RowErrorPolicy, format: OutputFormat) -> JobConfig {
        JobConfig { on_error, format, ..JobConfig::default() }
    }

    fn run_to_string(config: &JobConfig, with_key: bool) -> (Result<Counters, Error>, String) {
        let mut out = Vec::new();
        let result = run(Cursor::new(INPUT), config, with_key, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn millis_with_skip() {
        let (counters, out) =
            run_to_string(&config(RowErrorPolicy::Skip, OutputFormat::Millis), false);
        let counters = counters.unwrap();
        assert_eq!(out, "1382400000000\n86400000000000000\n86400000\nnull\n");
        assert_eq!(counters.rows, 5);
        assert_eq!(counters.skipped, 1);
        assert_eq!(counters.error_count(ErrorKind::DateParseError), 1);
    }

    #[test]
    fn rfc3339_out_of_range_rows_follow_the_policy() {
        let (counters, out) =
            run_to_string(&config(RowErrorPolicy::Skip, OutputFormat::Rfc3339), false);
        let counters = counters.unwrap();
        assert_eq!(out, "2013-10-22T00:00:00.000Z\n1970-01-02T00:00:00.000Z\nnull\n");
        assert_eq!(counters.values, 2);
        assert_eq!(counters.skipped, 2);
        assert_eq!(counters.error_count(ErrorKind::TimestampOverflow), 1);
        assert_eq!(counters.error_count(ErrorKind::DateParseError), 1);

        let (counters, out) =
            run_to_string(&config(RowErrorPolicy::Log, OutputFormat::Rfc3339), false);
        assert_eq!(counters.unwrap().nulls, 3);
        assert_eq!(out, "2013-10-22T00:00:00.000Z\nnull\nnull\n1970-01-02T00:00:00.000Z\nnull\n");
    }

    #[test]
    fn rfc3339_out_of_range_fails_the_run_by_default() {
        let (result, out) =
            run_to_string(&config(RowErrorPolicy::Fail, OutputFormat::Rfc3339), false);
        match result {
            Err(Error::Row(err)) => {
                assert_eq!(err.row, 2);
                assert_eq!(err.source.kind(), ErrorKind::TimestampOverflow);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(out, "2013-10-22T00:00:00.000Z\n");
    }

    #[test]
    fn keyed_output() {
        let (counters, out) =
            run_to_string(&config(RowErrorPolicy::Log, OutputFormat::Millis), true);
        counters.unwrap();
        assert_eq!(
            out,
            "a\t1382400000000\nb\t86400000000000000\nc\tnull\nd\t86400000\ne\tnull\n"
        );
    }

    #[test]
    fn unkeyed_records_ignore_with_key() {
        let input = "{\"data\": {\"last\": {\"org.mozilla.profile.age\": {\"profileCreation\": 2}}}}\n";
        let mut out = Vec::new();
        run(Cursor::new(input), &JobConfig::default(), true, &mut out).unwrap();
        assert_eq!(out, b"172800000\n");
    }

    #[test]
    fn malformed_payload_stops_the_run() {
        let input = "{\"data\": 1}\nnot json\n";
        let mut out = Vec::new();
        let config = config(RowErrorPolicy::Skip, OutputFormat::Millis);
        let err = run(Cursor::new(input), &config, false, &mut out).unwrap_err();
        assert!(matches!(err, Error::Payload(payload::Error::JSON { line: 2, .. })));
        assert_eq!(out, b"null\n");
    }
}
