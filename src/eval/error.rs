use bson::spec::ElementType;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    DateParseError,
    TimestampOverflow,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot interpret {value} ({element_type:?}) as a day count")]
    DateParse {
        element_type: ElementType,
        value: String,
    },

    #[error("{days} days since epoch is out of the timestamp range")]
    TimestampOverflow { days: i64 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DateParse { .. } => ErrorKind::DateParseError,
            Self::TimestampOverflow { .. } => ErrorKind::TimestampOverflow,
        }
    }
}
