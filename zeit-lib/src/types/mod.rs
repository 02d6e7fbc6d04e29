#![allow(unreachable_pub)]

mod api_error;
mod domain;
mod error;
mod record;
mod timestamp;

pub(crate) use api_error::ErrorBody;
pub use api_error::{ApiError, NsVerification, TxtVerification};
pub use domain::{Alias, Cert, Domain, DomainPrice, User};
pub use error::ErrorKind;
pub use record::{Record, RecordType};
pub use timestamp::Timestamp;

/// The zeit `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
