// Helper functions for safe logging and query building

use serde::Serializer;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            let first = parts[0].chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Builds a lowercase `LIKE` pattern matching `term` anywhere in a column.
/// `%`, `_` and `\` in the term are escaped; queries must use `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Serializes a JSON array column (stored as TEXT) as an array of URLs
pub fn serialize_url_list<S>(urls: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::Serialize;
    parse_url_list(urls).serialize(serializer)
}

/// Serializes a JSON object column (stored as TEXT) as the object itself
pub fn serialize_json_text<S>(raw: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::Serialize;
    serde_json::from_str::<serde_json::Value>(raw)
        .unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
        .serialize(serializer)
}

/// Parses a JSON array column into URLs, tolerating malformed rows
pub fn parse_url_list(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}

/// WHERE-clause accumulator for list queries with optional filters.
/// Every parameter is bound as TEXT in the order its condition was added.
#[derive(Debug, Default)]
pub struct SqlFilter {
    conditions: Vec<String>,
    params: Vec<String>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition with one `?` placeholder
    pub fn push(&mut self, condition: &str, param: impl Into<String>) {
        self.conditions.push(condition.to_string());
        self.params.push(param.into());
    }

    /// Adds a condition without placeholders
    pub fn push_raw(&mut self, condition: &str) {
        self.conditions.push(condition.to_string());
    }

    /// Case-insensitive substring match of `term` against any of `columns`.
    /// Blank terms add nothing.
    pub fn push_search(&mut self, columns: &[&str], term: &str) {
        if term.trim().is_empty() || columns.is_empty() {
            return;
        }
        let pattern = like_pattern(term);
        let clauses: Vec<String> = columns
            .iter()
            .map(|column| format!("LOWER({}) LIKE ? ESCAPE '\\'", column))
            .collect();
        self.conditions.push(format!("({})", clauses.join(" OR ")));
        for _ in columns {
            self.params.push(pattern.clone());
        }
    }

    /// ` WHERE a AND b`, or an empty string when there are no conditions
    pub fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Number of pages needed for `total` rows
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

/// Interprets an HTML-form style boolean ("true", "on", "1", "yes")
pub fn parse_form_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("student@campus.edu"), "s***@campus.edu");
        assert_eq!(safe_email_log("a@b"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" Library "), "%library%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }

    #[test]
    fn test_parse_url_list_tolerates_garbage() {
        assert_eq!(
            parse_url_list(r#"["https://a/1.png","https://a/2.png"]"#),
            vec!["https://a/1.png".to_string(), "https://a/2.png".to_string()]
        );
        assert!(parse_url_list("not json").is_empty());
    }

    #[test]
    fn test_sql_filter_builds_where_clause() {
        let mut filter = SqlFilter::new();
        assert_eq!(filter.where_sql(), "");

        filter.push("item_type = ?", "Laptop");
        filter.push_search(&["description", "location_found"], "Library");
        filter.push_raw("submitted_to_office = 1");

        assert_eq!(
            filter.where_sql(),
            " WHERE item_type = ? AND (LOWER(description) LIKE ? ESCAPE '\\' OR LOWER(location_found) LIKE ? ESCAPE '\\') AND submitted_to_office = 1"
        );
        assert_eq!(filter.params(), &["Laptop", "%library%", "%library%"]);
    }

    #[test]
    fn test_sql_filter_ignores_blank_search() {
        let mut filter = SqlFilter::new();
        filter.push_search(&["description"], "   ");
        assert_eq!(filter.where_sql(), "");
        assert!(filter.params().is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
    }

    #[test]
    fn test_parse_form_bool() {
        assert!(parse_form_bool("true"));
        assert!(parse_form_bool("ON"));
        assert!(!parse_form_bool("false"));
        assert!(!parse_form_bool(""));
    }
}
