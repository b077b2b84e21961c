//! Short plain-text descriptions cut from model cards.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::hub::HubClient;

pub const DEFAULT_SUMMARY_LEN: usize = 500;

/// Shorter lines are usually labels or leftovers of stripped markup.
const MIN_LINE_LEN: usize = 30;
/// How far past the limit to look for a sentence end.
const SENTENCE_SLACK: usize = 30;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").expect("static pattern"));
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("static pattern"));
static MD_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("static pattern"));
static MD_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]\(.*?\)").expect("static pattern"));
static LICENSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:license_link|License):.*").expect("static pattern"));
static FIELD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+:\s").expect("static pattern"));

/// Plain-text summary of a model card: its first prose lines joined, cut at
/// a sentence end near `max_len` characters.
///
/// Headers, code blocks, tables, badges, links and `key: value` lines are
/// skipped. Returns `None` when nothing usable is left.
pub fn summarize_readme(text: &str, max_len: usize) -> Option<String> {
    let text = HTML_TAG.replace_all(text, " ");
    let text = URL.replace_all(&text, " ");
    let text = MD_IMAGE.replace_all(&text, " ");
    let text = MD_LINK.replace_all(&text, " ");
    let text = LICENSE.replace_all(&text, "");

    let mut lines: Vec<String> = Vec::new();
    let mut joined_len = 0;
    let mut in_code_block = false;
    for line in text.lines() {
        if line.contains("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block || line.starts_with('|') || line.contains("---") {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || line.contains("![")
            || line.to_lowercase().contains("badge")
        {
            continue;
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '*' | '_' | '`'))
            .collect();
        let len = cleaned.chars().count();
        if len > MIN_LINE_LEN && !FIELD_LINE.is_match(&cleaned) && !lines.contains(&cleaned) {
            joined_len += len + usize::from(!lines.is_empty());
            lines.push(cleaned);
        }
        if joined_len >= max_len {
            break;
        }
    }
    if lines.is_empty() {
        return None;
    }

    let description = lines.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
    if description.chars().count() <= max_len {
        return Some(description);
    }
    let sentences = split_sentences(take_chars(&description, max_len + SENTENCE_SLACK));
    if sentences.len() > 1 {
        Some(sentences[..sentences.len() - 1].join(" "))
    } else {
        Some(format!("{}...", take_chars(&description, max_len)))
    }
}

/// Summary of the model card of Hugging Face repository `repo`, if one can
/// be fetched. Hub errors are logged and treated as no card.
pub async fn readme_summary<C>(client: &C, repo: &str) -> Option<String>
where
    C: HubClient + ?Sized,
{
    match client.readme(repo).await {
        Ok(Some(text)) => summarize_readme(&text, DEFAULT_SUMMARY_LEN),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(repo, error = %e, "could not fetch model card");
            None
        }
    }
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Split after `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            out.push(&text[start..i]);
            let mut end = i + c.len_utf8();
            while let Some(&(j, d)) = chars.peek() {
                if !d.is_whitespace() {
                    break;
                }
                end = j + d.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    out.push(&text[start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeHub;

    const CARD: &str = r#"---
license: apache-2.0
pipeline_tag: text-generation for chat and completion
---
# Qwen2.5-7B-Instruct
<a href="https://chat.qwen.ai/"><img src="https://img.shields.io/chat.svg"/></a>
[![Chat](https://img.shields.io/badge/chat-blue.svg)](https://chat.qwen.ai/)

## Introduction

Qwen2.5 is the latest series of **Qwen** large language models.
License: apache-2.0

```python
print("a line inside a code block that is long enough to count")
```

| Model | Context length of the model in tokens |
|---|---|
Short line.
It supports long contexts of up to 128K tokens and `multilingual` chat.
Qwen2.5 is the latest series of **Qwen** large language models.
"#;

    #[test]
    fn test_summary_keeps_prose_only() {
        assert_eq!(
            summarize_readme(CARD, DEFAULT_SUMMARY_LEN).as_deref(),
            Some(
                "Qwen2.5 is the latest series of Qwen large language models. \
                 It supports long contexts of up to 128K tokens and multilingual chat."
            )
        );
    }

    #[test]
    fn test_long_summary_cut_at_sentence_end() {
        let text = "First sentence is right here and long. Second sentence is also fairly long here. Third one.";
        assert_eq!(
            summarize_readme(text, 50).as_deref(),
            Some("First sentence is right here and long.")
        );
    }

    #[test]
    fn test_long_summary_without_sentence_end() {
        let text = "x".repeat(60);
        assert_eq!(summarize_readme(&text, 20), Some(format!("{}...", "x".repeat(20))));
    }

    #[test]
    fn test_card_without_prose() {
        assert_eq!(summarize_readme("", DEFAULT_SUMMARY_LEN), None);
        let card = "# Title\n\n```\nprint('a long enough line inside the only code block')\n```\n";
        assert_eq!(summarize_readme(card, DEFAULT_SUMMARY_LEN), None);
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(split_sentences("One. Two!  Three? four"), vec!["One.", "Two!", "Three?", "four"]);
        assert_eq!(split_sentences("v2.5 is out"), vec!["v2.5 is out"]);
    }

    #[tokio::test]
    async fn test_readme_summary_from_hub() {
        let mut hub = FakeHub::default();
        hub.readmes.insert("Qwen/Qwen2.5-7B".to_string(), CARD.to_string());
        hub.broken.insert("org/flaky".to_string());

        let summary = readme_summary(&hub, "Qwen/Qwen2.5-7B").await.unwrap();
        assert!(summary.starts_with("Qwen2.5 is the latest series"));
        assert_eq!(readme_summary(&hub, "org/missing").await, None);
        assert_eq!(readme_summary(&hub, "org/flaky").await, None);
    }
}
