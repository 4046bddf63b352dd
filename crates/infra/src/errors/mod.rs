//! Infrastructure error handling

mod conversions;

pub use conversions::InfraError;

use tripdesk_domain::TripDeskError;

/// Map any infrastructure error into the domain error.
pub fn to_domain<E>(err: E) -> TripDeskError
where
    InfraError: From<E>,
{
    InfraError::from(err).into()
}
