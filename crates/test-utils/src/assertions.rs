//! Assertions over rendered documents.

/// Syntax errors reported by `apollo-parser` for `document`, as messages.
#[must_use]
pub fn syntax_errors(document: &str) -> Vec<String> {
    let tree = apollo_parser::Parser::new(document).parse();
    tree.errors().map(|e| e.message().to_string()).collect()
}

/// Panic with the parser's messages unless `document` parses cleanly.
///
/// # Example
///
/// ```ignore
/// use graphql_test_utils::assertions::assert_valid_graphql;
///
/// assert_valid_graphql(&query.to_graphql(2)?);
/// ```
pub fn assert_valid_graphql(document: &str) {
    let errors = syntax_errors(document);
    assert!(
        errors.is_empty(),
        "document failed to parse:\n{document}\nerrors:\n{}",
        errors.join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document() {
        assert_valid_graphql(r#"query {repository(owner: "x") {title}}"#);
    }

    #[test]
    fn test_invalid_document() {
        assert!(!syntax_errors("query {repository(owner: ) {").is_empty());
    }
}
