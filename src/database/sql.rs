// file: src/database/sql.rs
// description: SQL literal quoting and predicate building for LanceDB filters
// reference: https://docs.rs/lancedb

/// Single-quoted string literal, inner quotes doubled.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn optional_text(value: Option<&str>) -> String {
    value.map(quote).unwrap_or_else(|| "NULL".to_string())
}

pub fn optional_int(value: Option<i64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "NULL".to_string())
}

pub fn optional_bool(value: Option<bool>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "NULL".to_string())
}

pub fn eq(column: &str, value: &str) -> String {
    format!("{} = {}", column, quote(value))
}

pub fn in_list<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let quoted: Vec<String> = values.into_iter().map(quote).collect();
    if quoted.is_empty() {
        return None;
    }
    Some(format!("{} IN ({})", column, quoted.join(", ")))
}

/// Joins the given predicates with AND; `None` when there are none.
pub fn and(predicates: Vec<String>) -> Option<String> {
    if predicates.is_empty() {
        None
    } else {
        Some(predicates.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("abc"), "'abc'");
        assert_eq!(quote("it's"), "'it''s'");
    }

    #[test]
    fn test_optional_literals() {
        assert_eq!(optional_text(None), "NULL");
        assert_eq!(optional_text(Some("x")), "'x'");
        assert_eq!(optional_int(Some(-3)), "-3");
        assert_eq!(optional_bool(Some(false)), "false");
    }

    #[test]
    fn test_predicates() {
        assert_eq!(eq("uuid", "a"), "uuid = 'a'");
        assert_eq!(
            in_list("uuid", ["a", "b"]).as_deref(),
            Some("uuid IN ('a', 'b')")
        );
        assert_eq!(in_list("uuid", Vec::<&str>::new()), None);
        assert_eq!(
            and(vec!["a = 1".to_string(), "b = 2".to_string()]).as_deref(),
            Some("a = 1 AND b = 2")
        );
        assert_eq!(and(Vec::new()), None);
    }
}
