use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::batch::RowErrorPolicy;
use crate::payload::FieldPath;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error reading the job config")]
    IO(#[from] std::io::Error),

    #[error("error parsing the job config")]
    JSON(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Milliseconds since the Unix epoch
    #[default]
    Millis,
    /// RFC 3339 timestamp in UTC
    Rfc3339,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub fields: Vec<FieldPath>,
    pub on_error: RowErrorPolicy,
    pub format: OutputFormat,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            fields: vec![FieldPath::profile_creation()],
            on_error: RowErrorPolicy::default(),
            format: OutputFormat::default(),
        }
    }
}

impl JobConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
