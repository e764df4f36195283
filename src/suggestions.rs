//! Example legal queries for the empty state.
//!
//! The backend curates these at /api/examples; when it is unreachable a
//! built-in set with the same categories is shown instead.

use crate::api::ExampleCategory;

/// Built-in example queries, mirroring the backend's curated set.
pub fn default_examples() -> Vec<ExampleCategory> {
    vec![
        ExampleCategory {
            category: "Definitions".to_string(),
            queries: vec![
                "What is the definition of theft under BNS?".to_string(),
                "Define criminal conspiracy in legal terms".to_string(),
                "What constitutes assault under Indian law?".to_string(),
            ],
        },
        ExampleCategory {
            category: "Procedures".to_string(),
            queries: vec![
                "What is the procedure for filing an FIR?".to_string(),
                "How is bail granted in criminal cases?".to_string(),
                "What are the steps in a criminal trial?".to_string(),
            ],
        },
        ExampleCategory {
            category: "Penalties".to_string(),
            queries: vec![
                "What is the punishment for murder under BNS?".to_string(),
                "What are the penalties for fraud?".to_string(),
                "What is the sentence for drug trafficking?".to_string(),
            ],
        },
        ExampleCategory {
            category: "Legal Provisions".to_string(),
            queries: vec![
                "What does Section 103 of BNS say?".to_string(),
                "Explain the provisions related to self-defense".to_string(),
                "What are the rights of an accused person?".to_string(),
            ],
        },
    ]
}

/// Render categories as indented display lines.
pub fn render_examples(categories: &[ExampleCategory]) -> Vec<String> {
    let mut lines = Vec::new();
    for category in categories {
        lines.push(format!("{}:", category.category));
        for query in &category.queries {
            lines.push(format!("  {query}"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_four_categories() {
        let examples = default_examples();
        assert_eq!(examples.len(), 4);
        assert!(examples.iter().any(|c| c.category == "Penalties"));
        assert!(examples
            .iter()
            .flat_map(|c| &c.queries)
            .any(|q| q == "What is the punishment for murder under BNS?"));
    }

    #[test]
    fn rendering_indents_queries_under_category() {
        let lines = render_examples(&default_examples());
        assert_eq!(lines[0], "Definitions:");
        assert!(lines[1].starts_with("  "));
    }

    #[test]
    fn empty_categories_render_nothing() {
        assert!(render_examples(&[]).is_empty());
    }
}
