/// Parses `key=value&key2=value2` into `(key, value)` pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_owned(), v.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

/// Reads a boolean flag. `true`/`1`/`yes` and `false`/`0`/`no` are accepted,
/// a bare key counts as `true`, anything else as absent.
pub fn query_flag(pairs: &[(String, String)], key: &str) -> Option<bool> {
    let (_, value) = pairs.iter().find(|(k, _)| k == key)?;
    match value.to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_flags() {
        let pairs = parse_query("invert=false&debug");
        assert_eq!(query_flag(&pairs, "invert"), Some(false));
        assert_eq!(query_flag(&pairs, "debug"), Some(true));
        assert_eq!(query_flag(&pairs, "missing"), None);
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(parse_query("").is_empty());
    }
}
