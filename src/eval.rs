use bson::Bson;

mod error;
mod profile_creation;

pub use self::error::{Error, ErrorKind};
pub use self::profile_creation::{
    day_count, days_to_unix_millis, ProfileCreationTime, ProfileCreationTimestamp,
};

pub type Result<T> = std::result::Result<T, Error>;

/// A row-to-scalar evaluator invoked by the host once per input record.
///
/// `input` is `None` when the host has no row at all. Returning `Ok(None)` means the value is
/// absent for this row, which the host treats as a null rather than a failure. Implementations
/// are shared between rows (and possibly threads), so they must not keep per-call state.
pub trait EvalFunc {
    type Output;

    fn name(&self) -> &str;

    fn exec(&self, input: Option<&[Bson]>) -> Result<Option<Self::Output>>;
}

pub fn first_field(input: Option<&[Bson]>) -> Option<&Bson> {
    match input?.first()? {
        Bson::Null | Bson::Undefined => None,
        value => Some(value),
    }
}
