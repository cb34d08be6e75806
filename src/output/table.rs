//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct TestRow {
        #[tabled(rename = "BROWSER")]
        browser: String,
        #[tabled(rename = "PROFILE")]
        profile: String,
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<TestRow> = vec![];
        let result = format_table(&items);
        assert_eq!(result, "No results found.");
    }

    #[test]
    fn test_format_table_rows() {
        let items = vec![
            TestRow {
                browser: "Chrome".to_string(),
                profile: "Default".to_string(),
            },
            TestRow {
                browser: "Firefox".to_string(),
                profile: "abcd.default".to_string(),
            },
        ];

        let result = format_table(&items);

        assert!(result.contains("BROWSER"));
        assert!(result.contains("Chrome"));
        assert!(result.contains("abcd.default"));
    }
}
