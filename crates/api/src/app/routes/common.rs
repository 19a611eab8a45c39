use core::str::FromStr;

use dealerhub_core::DomainError;

use crate::app::errors::ApiError;

/// Parse a path id; a malformed id is a 400.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    Ok(raw.parse::<T>()?)
}
