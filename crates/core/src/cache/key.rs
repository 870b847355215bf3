//! Cache key derivation.

/// Cache key for an inbound query string.
///
/// The raw query string is the key, byte for byte. Parameter order is not
/// normalized: `a=1&b=2` and `b=2&a=1` are different entries.
pub fn cache_key(raw_query: Option<&str>) -> String {
    raw_query.unwrap_or_default().to_owned()
}
