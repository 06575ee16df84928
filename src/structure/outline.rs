use std::fmt::Write;

use crate::model::Article;

/// Renders the tree the way the upload UI lists it, one node per line.
pub fn render_outline(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found.\n".to_string();
    }

    let mut output = String::new();
    for article in articles {
        let _ = writeln!(output, "Article {}: {}", article.number, article.title);
        for rule in &article.rules {
            let _ = writeln!(output, "- {}", rule.text);
            for sub_rule in &rule.sub_rules {
                let _ = writeln!(output, "  • {}", sub_rule.text);
                for sub_sub_rule in &sub_rule.sub_rules {
                    let _ = writeln!(output, "    ◦ {}", sub_sub_rule.text);
                }
            }
        }
    }

    output
}

/// Returns at most `max_chars` characters from the start of `text`.
pub fn preview_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
