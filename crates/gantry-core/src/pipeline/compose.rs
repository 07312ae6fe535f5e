//! Prompt composition and citations.

use serde::Serialize;

use super::traits::RetrievedPassage;

/// Longest snippet shown in a citation, in characters.
pub const SNIPPET_CHARS: usize = 200;

/// A numbered reference to a passage used for an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    /// 1-based, in retrieval order.
    pub index: usize,
    pub confidence_score: f64,
    pub source_path: String,
    pub text_snippet: String,
}

/// Passage texts joined by newlines, in retrieval order.
pub fn context_block(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The prompt sent for generation. `prompt` is used verbatim.
pub fn compose_prompt(context: &str, prompt: &str) -> String {
    format!("Context: {context}\n\nUser: {prompt}\n\n")
}

pub fn citations(passages: &[RetrievedPassage]) -> Vec<Citation> {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| Citation {
            index: i + 1,
            confidence_score: p.confidence_score,
            source_path: p.source_path.clone(),
            text_snippet: truncate_chars(&p.text, SNIPPET_CHARS),
        })
        .collect()
}

/// Cut `text` to `max` characters, appending `...` when shortened.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, score: f64) -> RetrievedPassage {
        RetrievedPassage {
            text: text.into(),
            confidence_score: score,
            source_path: format!("s3://kb/{score}.txt"),
        }
    }

    #[test]
    fn context_joins_in_order() {
        let ps = vec![passage("first", 0.9), passage("second", 0.5)];
        assert_eq!(context_block(&ps), "first\nsecond");
        assert_eq!(context_block(&[]), "");
    }

    #[test]
    fn composed_prompt_format() {
        assert_eq!(
            compose_prompt("a\nb", "What oil?"),
            "Context: a\nb\n\nUser: What oil?\n\n"
        );
        assert_eq!(compose_prompt("", "q"), "Context: \n\nUser: q\n\n");
    }

    #[test]
    fn citations_are_one_based() {
        let cs = citations(&[passage("a", 0.9), passage("b", 0.4)]);
        assert_eq!(cs.iter().map(|c| c.index).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(cs[1].confidence_score, 0.4);
        assert_eq!(cs[1].source_path, "s3://kb/0.4.txt");
    }

    #[test]
    fn long_snippets_are_truncated() {
        let long = "x".repeat(250);
        let cs = citations(&[passage(&long, 0.5)]);
        assert_eq!(cs[0].text_snippet.chars().count(), SNIPPET_CHARS + 3);
        assert!(cs[0].text_snippet.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééé", 2), "éé...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
    }
}
