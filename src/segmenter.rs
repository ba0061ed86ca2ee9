//! Content normalisation plus paragraph and sentence splitting.
//!
//! Splitting is punctuation based.  A paragraph is split after Japanese
//! terminators (`。！？`); paragraphs that contain none of them fall back to
//! Latin terminators (`.!?`).  Segmentation never drops or duplicates text:
//! concatenating the sentences of a paragraph, ignoring whitespace, yields
//! the paragraph again.

use regex::Regex;
use std::sync::LazyLock;

pub const JAPANESE_TERMINATORS: [char; 3] = ['。', '！', '？'];
pub const LATIN_TERMINATORS: [char; 3] = ['.', '!', '?'];

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Paragraphs and sentences derived from one normalised content string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub paragraphs: Vec<String>,
    pub sentences: Vec<String>,
}

/// Collapse three or more consecutive newlines to exactly two and trim the
/// result.  Applying it to its own output changes nothing.
pub fn normalize_content(raw: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(raw, "\n\n")
        .trim()
        .to_string()
}

/// Split normalised content on blank lines.  Inside each paragraph every
/// whitespace run, single newlines included, becomes one space.  Empty
/// paragraphs are dropped.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(content)
        .map(|chunk| WHITESPACE_RUN.replace_all(chunk, " ").trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split one paragraph into sentences.
///
/// A terminator stays attached to the text before it.  A run of
/// terminators (`！？`, `...`) is deliberately kept in one sentence instead
/// of being split after each mark, so `本当？！はい。` yields `本当？！` and
/// `はい。` and no terminator is dropped.  A trailing fragment without
/// terminator is kept as its own sentence.
///
/// ```rust
/// use kiji_rs::segmenter::split_sentences;
///
/// assert_eq!(split_sentences("雨です。寒い！"), vec!["雨です。", "寒い！"]);
/// assert_eq!(split_sentences("Hello world. Great news!"), vec!["Hello world.", "Great news!"]);
/// assert_eq!(split_sentences("本当？！はい。"), vec!["本当？！", "はい。"]);
/// ```
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    let terminators: &[char] = if paragraph.contains(JAPANESE_TERMINATORS) {
        &JAPANESE_TERMINATORS
    } else {
        &LATIN_TERMINATORS
    };
    split_after_terminators(paragraph, terminators)
}

fn split_after_terminators(text: &str, terminators: &[char]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !terminators.contains(&c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !terminators.contains(&next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        push_trimmed(&mut sentences, &text[start..end]);
        start = end;
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed(out: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(fragment.to_string());
    }
}

/// Split normalised content into paragraphs, then every paragraph into
/// sentences, keeping document order throughout.
pub fn segment(content: &str) -> Segmentation {
    let paragraphs = split_paragraphs(content);
    let sentences = paragraphs
        .iter()
        .flat_map(|p| split_sentences(p))
        .collect();
    Segmentation {
        paragraphs,
        sentences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn normalize_collapses_newline_runs_and_trims() {
        assert_eq!(normalize_content("\n【背景】\n\n\n\nA。\n\n\n"), "【背景】\n\nA。");
        assert_eq!(normalize_content("a\nb"), "a\nb");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["\n\n\na\n\n\n\nb\n", "  x \n\n\n y  ", "", "\n\n\n"] {
            let once = normalize_content(raw);
            assert_eq!(normalize_content(&once), once);
        }
    }

    #[test]
    fn paragraphs_flatten_single_newlines() {
        let content = "一行目\n二行目\n\n次の段落。\n\n\n\n";
        assert_eq!(split_paragraphs(content), vec!["一行目 二行目", "次の段落。"]);
    }

    #[test]
    fn paragraphs_drop_empty_chunks() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs(" \n\n \n\n").is_empty());
    }

    #[test]
    fn japanese_sentences_keep_terminators() {
        assert_eq!(
            split_sentences("今日は晴れです。明日は雨？ たぶん！ 続き"),
            vec!["今日は晴れです。", "明日は雨？", "たぶん！", "続き"]
        );
    }

    #[test]
    fn japanese_terminators_win_over_latin() {
        assert_eq!(
            split_sentences("GDPは1.5%増えた。次に"),
            vec!["GDPは1.5%増えた。", "次に"]
        );
    }

    #[test]
    fn latin_fallback() {
        assert_eq!(
            split_sentences("Hello world. Great news!"),
            vec!["Hello world.", "Great news!"]
        );
    }

    #[test]
    fn terminator_runs_stay_together() {
        assert_eq!(split_sentences("本当？！はい。"), vec!["本当？！", "はい。"]);
        assert_eq!(split_sentences("Wait... what?!"), vec!["Wait...", "what?!"]);
    }

    #[test]
    fn no_terminators_is_one_sentence() {
        assert_eq!(split_sentences("見出しだけ"), vec!["見出しだけ"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn lone_terminator_is_kept() {
        assert_eq!(split_sentences("。"), vec!["。"]);
    }

    #[test]
    fn segment_preserves_order_and_text() {
        let content = "【背景】\n\nこれは説明です。二つ目。\n\nFirst. Second";
        let seg = segment(content);
        assert_eq!(seg.paragraphs, vec!["【背景】", "これは説明です。二つ目。", "First. Second"]);
        assert_eq!(
            seg.sentences,
            vec!["【背景】", "これは説明です。", "二つ目。", "First.", "Second"]
        );
        assert_eq!(
            strip_whitespace(&seg.sentences.concat()),
            strip_whitespace(&seg.paragraphs.concat())
        );
    }
}
