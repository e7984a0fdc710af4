use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error reading payloads")]
    IO(#[from] std::io::Error),

    #[error("line {line}: error parsing payload JSON")]
    JSON {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
