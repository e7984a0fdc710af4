use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use bson::{Bson, Document};
use flate2::bufread::MultiGzDecoder;

mod error;
mod path;

pub use self::error::Error;
pub use self::path::{FieldPath, InvalidFieldPath};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: Option<String>,
    pub doc: Document,
}

impl Record {
    pub fn project(&self, fields: &[FieldPath]) -> Vec<Bson> {
        fields
            .iter()
            .map(|field| field.resolve(&self.doc).cloned().unwrap_or(Bson::Null))
            .collect()
    }
}

/// Parses either a bare JSON object or a `key<TAB>json` line, as dumped from the payload store.
pub fn parse_record(line: &str) -> serde_json::Result<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (key, json) = match line.split_once('\t') {
        Some((key, json)) if !line.trim_start().starts_with('{') => (Some(key.to_owned()), json),
        _ => (None, line),
    };
    Ok(Record { key, doc: serde_json::from_str(json)? })
}

pub struct Records<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                parse_record(&line).map_err(|source| Error::JSON { line: self.line, source }),
            );
        }
    }
}

pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = BufReader::new(File::open(path)?);
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(file))
    }
}
