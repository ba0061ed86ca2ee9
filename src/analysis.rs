//! The pure half of the language-model boundary.
//!
//! [`AnalyzeRequest`] turns an extracted article into prompt text and a
//! `generateContent` request body.  [`parse_analysis`] reads the model's
//! reply, tolerating prose around the JSON, and normalises it into typed
//! [`Analysis`] entries.  Entries missing a required field are dropped
//! rather than failing the whole reply.

use crate::error::{AnalysisError, Result};
use crate::highlighter::VocabCandidate;
use crate::models::ExtractedArticle;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const DEFAULT_MAX_VOCAB: usize = 25;
pub const MAX_VOCAB_RANGE: RangeInclusive<usize> = 5..=60;
pub const DEFAULT_MAX_GRAMMAR: usize = 10;
pub const MAX_GRAMMAR_RANGE: RangeInclusive<usize> = 0..=30;
pub const TEMPERATURE: f64 = 0.3;

// outermost {...}, used when the model wraps its JSON in prose or fences
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

const SYSTEM_PROMPT: &str = "You are a Japanese tutor for Vietnamese learners.\n\
Reply with one valid JSON object only: no markdown, no commentary.\n\
Extract the vocabulary (kanji and words) and grammar points worth studying from the Japanese news article.\n\
Skip trivial words and filler.\n\
Give every item short, accurate, polite example sentences with natural Vietnamese translations.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub jp: String,
    pub vi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    /// The word exactly as it appears in the article.
    pub surface_form: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    pub meaning_vi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jlpt: Option<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarEntry {
    pub pattern: String,
    pub explanation_vi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// A validated model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub vocab: Vec<VocabEntry>,
    pub grammar: Vec<GrammarEntry>,
}

impl Analysis {
    /// Highlight candidates for [`crate::highlighter`]; `index` is the
    /// position of the entry in [`Analysis::vocab`].
    pub fn candidates(&self) -> Vec<VocabCandidate> {
        self.vocab
            .iter()
            .enumerate()
            .map(|(index, entry)| VocabCandidate::new(entry.surface_form.clone(), index))
            .collect()
    }

    /// The vocab entry a highlight points at.
    pub fn vocab_entry(&self, candidate_index: usize) -> Option<&VocabEntry> {
        self.vocab.get(candidate_index)
    }
}

/// Input for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    content: String,
    sentences: Vec<String>,
    max_vocab: usize,
    max_grammar: usize,
}

impl AnalyzeRequest {
    /// Fails with [`AnalysisError::EmptyContent`] when `content` is blank.
    pub fn new(content: impl Into<String>) -> Result<AnalyzeRequest> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyContent);
        }
        Ok(AnalyzeRequest {
            content,
            sentences: vec![],
            max_vocab: DEFAULT_MAX_VOCAB,
            max_grammar: DEFAULT_MAX_GRAMMAR,
        })
    }

    /// Build a request from an article's content and sentences.  The summary
    /// stands in for the body when the page had no extractable content.
    pub fn from_article(article: &ExtractedArticle) -> Result<AnalyzeRequest> {
        let content = if article.content.trim().is_empty() {
            article.summary.clone()
        } else {
            article.content.clone()
        };
        Ok(AnalyzeRequest::new(content)?.with_sentences(article.sentences.clone()))
    }

    pub fn with_sentences(mut self, sentences: Vec<String>) -> AnalyzeRequest {
        self.sentences = sentences;
        self
    }

    /// Clamped to [`MAX_VOCAB_RANGE`].
    pub fn with_max_vocab(mut self, max_vocab: usize) -> AnalyzeRequest {
        self.max_vocab = max_vocab.clamp(*MAX_VOCAB_RANGE.start(), *MAX_VOCAB_RANGE.end());
        self
    }

    /// Clamped to [`MAX_GRAMMAR_RANGE`].
    pub fn with_max_grammar(mut self, max_grammar: usize) -> AnalyzeRequest {
        self.max_grammar =
            max_grammar.clamp(*MAX_GRAMMAR_RANGE.start(), *MAX_GRAMMAR_RANGE.end());
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn max_vocab(&self) -> usize {
        self.max_vocab
    }

    pub fn max_grammar(&self) -> usize {
        self.max_grammar
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn user_prompt(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str("Japanese article:\n-----\n");
        prompt.push_str(&self.content);
        prompt.push_str("\n-----\n");
        if !self.sentences.is_empty() {
            prompt.push_str("Pre-split sentences (for reference):\n");
            prompt.push_str(&self.sentences.join("\n"));
            prompt.push('\n');
        }
        prompt.push_str(&format!(
            "\nTasks:\n\
             1) List at most {} vocabulary items (vocab):\n\
             \x20  - surfaceForm: the form used in the article\n\
             \x20  - reading: kana reading, if any\n\
             \x20  - lemma: dictionary form, if different\n\
             \x20  - meaningVi: short, precise Vietnamese meaning\n\
             \x20  - partOfSpeech: e.g. 名詞, 動詞, 形容詞, 副詞, 助詞\n\
             \x20  - jlpt: N5..N1 only when known, never guessed\n\
             \x20  - examples: 1-2 natural examples (jp, vi) containing surfaceForm\n\
             \n2) List at most {} grammar points (grammar):\n\
             \x20  - pattern: the pattern as used in the article\n\
             \x20  - explanationVi: Vietnamese explanation\n\
             \x20  - usage: nuance or politeness notes, if needed\n\
             \x20  - examples: 1-2 examples (jp, vi)\n\
             \n3) Return JSON with exactly this schema:\n",
            self.max_vocab, self.max_grammar
        ));
        prompt.push_str(
            r#"{"vocab":[{"surfaceForm":"...","reading":"...","lemma":"...","meaningVi":"...","partOfSpeech":"...","jlpt":"N3","examples":[{"jp":"...","vi":"..."}]}],"grammar":[{"pattern":"...","explanationVi":"...","usage":"...","examples":[{"jp":"...","vi":"..."}]}]}"#,
        );
        prompt
    }

    /// The JSON body of a `generateContent` call: one system instruction,
    /// one user turn, low temperature and a JSON response type.
    pub fn to_generate_content_body(&self) -> Value {
        json!({
            "system_instruction": { "parts": [{ "text": self.system_prompt() }] },
            "contents": [{
                "role": "user",
                "parts": [{ "text": self.user_prompt() }],
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "responseMimeType": "application/json",
            },
        })
    }
}

/// Pull the reply text out of a `generateContent` response envelope
/// (`candidates[0].content.parts[0].text`).
pub fn response_text(envelope: &Value) -> Result<&str> {
    envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .ok_or(AnalysisError::EmptyResponse)
}

/// Parse and normalise a model reply.
///
/// The reply is parsed as JSON; failing that, the outermost `{...}` inside
/// it is tried.  `vocab` and `grammar` must both be arrays.  String fields
/// are trimmed, numbers are stringified and anything else counts as
/// missing.  Vocab entries need `surfaceForm` and `meaningVi`, grammar
/// entries need `pattern` and `explanationVi`, examples need `jp` and `vi`;
/// whatever lacks them is dropped.
pub fn parse_analysis(text: &str) -> Result<Analysis> {
    let value = parse_lenient(text)?;
    let vocab = required_array(&value, "vocab")?;
    let grammar = required_array(&value, "grammar")?;

    let analysis = Analysis {
        vocab: vocab.iter().filter_map(vocab_entry).collect(),
        grammar: grammar.iter().filter_map(grammar_entry).collect(),
    };
    let dropped = (vocab.len() - analysis.vocab.len(), grammar.len() - analysis.grammar.len());
    if dropped != (0, 0) {
        tracing::debug!(
            dropped_vocab = dropped.0,
            dropped_grammar = dropped.1,
            "discarded malformed analysis entries"
        );
    }
    Ok(analysis)
}

fn parse_lenient(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match JSON_OBJECT.find(text) {
            Some(object) => Ok(serde_json::from_str(object.as_str())?),
            None => Err(err.into()),
        },
    }
}

fn required_array<'v>(value: &'v Value, key: &str) -> Result<&'v Vec<Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::Schema {
            reason: format!("`{}` is missing or not an array", key),
        })
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_field(value: &Value, key: &str) -> Option<String> {
    Some(text_field(value, key)).filter(|s| !s.is_empty())
}

fn examples(value: &Value) -> Vec<Example> {
    value
        .get("examples")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|ex| Example {
                    jp: text_field(ex, "jp"),
                    vi: text_field(ex, "vi"),
                })
                .filter(|ex| !ex.jp.is_empty() && !ex.vi.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn vocab_entry(value: &Value) -> Option<VocabEntry> {
    let surface_form = text_field(value, "surfaceForm");
    let meaning_vi = text_field(value, "meaningVi");
    if surface_form.is_empty() || meaning_vi.is_empty() {
        return None;
    }
    Some(VocabEntry {
        surface_form,
        reading: optional_field(value, "reading"),
        lemma: optional_field(value, "lemma"),
        meaning_vi,
        part_of_speech: optional_field(value, "partOfSpeech"),
        jlpt: optional_field(value, "jlpt"),
        examples: examples(value),
    })
}

fn grammar_entry(value: &Value) -> Option<GrammarEntry> {
    let pattern = text_field(value, "pattern");
    let explanation_vi = text_field(value, "explanationVi");
    if pattern.is_empty() || explanation_vi.is_empty() {
        return None;
    }
    Some(GrammarEntry {
        pattern,
        explanation_vi,
        usage: optional_field(value, "usage"),
        examples: examples(value),
    })
}
