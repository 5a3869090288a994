use std::collections::HashMap;

/// Decoded query parameters of a URL
pub type QueryParams = HashMap<String, String>;

/// Decodes the query string of an absolute or relative URL
///
/// Everything after the first `?` (up to a `#`) is split on `&`, each pair on
/// its first `=`, and both sides are form-decoded (`+` becomes a space,
/// percent escapes are resolved). A key without `=` maps to an empty string.
/// When a key repeats, the last occurrence wins.
///
/// # Examples
///
/// ```
/// use market_crawler::url::query_params;
///
/// let params = query_params("/details?id=com.example&id=com.other&q=a+b");
/// assert_eq!(params.get("id").map(String::as_str), Some("com.other"));
/// assert_eq!(params.get("q").map(String::as_str), Some("a b"));
/// ```
pub fn query_params(url: &str) -> QueryParams {
    let Some((_, query)) = url.split_once('?') else {
        return QueryParams::new();
    };

    let query = query.split_once('#').map_or(query, |(q, _)| q);

    ::url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_query() {
        assert!(query_params("https://example.com/store/apps/").is_empty());
        assert!(query_params("").is_empty());
    }

    #[test]
    fn test_single_param() {
        let params = query_params("https://example.com/details?id=com.example.app");
        assert_eq!(params.len(), 1);
        assert_eq!(params["id"], "com.example.app");
    }

    #[test]
    fn test_relative_url() {
        let params = query_params("/developer?pub=Acme+Corp");
        assert_eq!(params["pub"], "Acme Corp");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let params = query_params("/details?id=first&id=second");
        assert_eq!(params["id"], "second");
    }

    #[test]
    fn test_percent_decoding() {
        let params = query_params("/url?q=http%3A%2F%2Fdev.example.com%2F&sa=D");
        assert_eq!(params["q"], "http://dev.example.com/");
        assert_eq!(params["sa"], "D");
    }

    #[test]
    fn test_key_without_value() {
        let params = query_params("/details?id=a&flag");
        assert_eq!(params["flag"], "");
    }

    #[test]
    fn test_value_with_equals() {
        let params = query_params("/x?token=a=b");
        assert_eq!(params["token"], "a=b");
    }

    #[test]
    fn test_fragment_ignored() {
        let params = query_params("/details?id=com.example#reviews");
        assert_eq!(params["id"], "com.example");
    }

    #[test]
    fn test_only_first_question_mark_splits() {
        let params = query_params("/url?q=https://x.com/?a=1");
        assert_eq!(params["q"], "https://x.com/?a=1");
    }
}
