use crate::error::internal::InternalError;

/// Parses a non-zero u64 Discord id from a string
///
/// Surrounding whitespace is ignored.
///
/// # Arguments
/// - `value` - The string to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed, non-zero id
/// - `Err(InternalError::ParseStringId)` - The string is not a u64
/// - `Err(InternalError::ZeroId)` - The string parsed to zero
pub fn parse_u64_from_string(value: &str) -> Result<u64, InternalError> {
    let trimmed = value.trim();
    let id = trimmed
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId {
            value: trimmed.to_string(),
            source: e,
        })?;

    if id == 0 {
        return Err(InternalError::ZeroId {
            value: trimmed.to_string(),
        });
    }

    Ok(id)
}

/// Parses a comma separated list of ids, skipping empty entries
///
/// # Returns
/// - `Ok(Vec<u64>)` - Ids in the order given, duplicates preserved
/// - `Err(InternalError)` - The first entry that failed to parse
pub fn parse_u64_list(value: &str) -> Result<Vec<u64>, InternalError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_u64_from_string)
        .collect()
}
