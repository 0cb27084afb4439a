use crate::serp::SearchRecord;

/// Renders the search results belonging to `entity` as one text block
/// suitable for a model prompt: three `Title:`/`Snippet:`/`URL:` lines per
/// record, records joined by newlines.
///
/// Records keep their original relative order and are matched on the exact
/// entity string. Missing fields render as empty. Returns an empty string
/// when no record matches; extracting from an empty context is the caller's
/// call, not an error here.
pub fn aggregate(records: &[SearchRecord], entity: &str) -> String {
    records
        .iter()
        .filter(|record| record.entity == entity)
        .map(|record| {
            format!(
                "Title: {}\nSnippet: {}\nURL: {}",
                record.title.as_deref().unwrap_or_default(),
                record.snippet.as_deref().unwrap_or_default(),
                record.url.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entity: &str, title: &str, snippet: &str, url: &str) -> SearchRecord {
        SearchRecord {
            entity: entity.to_string(),
            title: Some(title.to_string()),
            snippet: Some(snippet.to_string()),
            url: Some(url.to_string()),
        }
    }

    #[test]
    fn renders_three_lines_per_record() {
        let records = vec![record("Acme", "Acme Inc", "Contact: info@acme.com", "acme.com")];

        assert_eq!(
            aggregate(&records, "Acme"),
            "Title: Acme Inc\nSnippet: Contact: info@acme.com\nURL: acme.com"
        );
    }

    #[test]
    fn filters_to_exact_entity_and_preserves_order() {
        let records = vec![
            record("Acme", "First", "s1", "u1"),
            record("Globex", "Other", "s", "u"),
            record("Acme", "Second", "s2", "u2"),
        ];

        let text = aggregate(&records, "Acme");
        assert!(text.contains("First"));
        assert!(text.contains("Second"));
        assert!(!text.contains("Other"));
        assert!(text.find("First").unwrap() < text.find("Second").unwrap());
    }

    #[test]
    fn entity_match_is_not_a_prefix_match() {
        let records = vec![record("Acme Corp", "t", "s", "u")];
        assert_eq!(aggregate(&records, "Acme"), "");
    }

    #[test]
    fn missing_fields_render_empty() {
        let records = vec![SearchRecord {
            entity: "Acme".to_string(),
            title: None,
            snippet: Some("only a snippet".to_string()),
            url: None,
        }];

        assert_eq!(
            aggregate(&records, "Acme"),
            "Title: \nSnippet: only a snippet\nURL: "
        );
    }

    #[test]
    fn no_matching_records_is_empty_text() {
        assert_eq!(aggregate(&[], "Acme"), "");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            record("Acme", "a", "b", "c"),
            record("Acme", "d", "e", "f"),
        ];
        assert_eq!(aggregate(&records, "Acme"), aggregate(&records, "Acme"));
    }
}
