//! Maps vocabulary surface forms back onto sentences as highlight ranges.
//!
//! [`resolve_spans`] finds every literal occurrence of every candidate in a
//! sentence and keeps a non-overlapping subset, preferring the leftmost
//! match and, among matches starting at the same position, the longest.
//! [`segment_sentence`] then cuts the sentence into plain and highlighted
//! pieces for rendering.
//!
//! Offsets are counted in characters (Unicode scalar values), not bytes.
//!
//! ```rust
//! use kiji_rs::highlighter::{resolve_spans, segment_sentence, Segment, VocabCandidate};
//!
//! let candidates = vec![VocabCandidate::new("東京", 0), VocabCandidate::new("東京都", 1)];
//! let ranges = resolve_spans("東京都に行く", &candidates);
//! assert_eq!((ranges[0].start, ranges[0].end, ranges[0].candidate_index), (0, 3, 1));
//!
//! let segments = segment_sentence("東京都に行く", &ranges);
//! assert_eq!(
//!     segments,
//!     vec![
//!         Segment::Highlight { text: "東京都", candidate_index: 1 },
//!         Segment::Plain("に行く"),
//!     ]
//! );
//! ```

/// A vocabulary entry as seen by the resolver: the text to look for and the
/// index the caller uses to find the full entry again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabCandidate {
    pub surface_form: String,
    pub index: usize,
}

impl VocabCandidate {
    pub fn new(surface_form: impl Into<String>, index: usize) -> VocabCandidate {
        VocabCandidate {
            surface_form: surface_form.into(),
            index,
        }
    }

    fn is_searchable(&self) -> bool {
        !self.surface_form.trim().is_empty()
    }
}

/// Half-open `[start, end)` character range inside one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
    pub candidate_index: usize,
}

impl MatchRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One piece of a rendered sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight { text: &'a str, candidate_index: usize },
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            Segment::Plain(text) => text,
            Segment::Highlight { text, .. } => text,
        }
    }
}

/// Byte offset of every character boundary in a string, including the end.
struct CharBoundaries(Vec<usize>);

impl CharBoundaries {
    fn new(text: &str) -> CharBoundaries {
        let mut offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        offsets.push(text.len());
        CharBoundaries(offsets)
    }

    fn char_index(&self, byte_offset: usize) -> usize {
        // offsets from `str::find` always sit on a boundary
        self.0
            .binary_search(&byte_offset)
            .unwrap_or_else(|insert_at| insert_at)
    }

    fn byte_offset(&self, char_index: usize) -> Option<usize> {
        self.0.get(char_index).copied()
    }

    fn char_count(&self) -> usize {
        self.0.len() - 1
    }
}

/// Byte offsets of every occurrence of `needle` in `haystack`, overlapping
/// ones included.  The search resumes one character past each hit.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        if needle.is_empty() {
            return None;
        }
        let pos = from + haystack.get(from..)?.find(needle)?;
        let step = haystack[pos..].chars().next().map_or(1, char::len_utf8);
        from = pos + step;
        Some(pos)
    })
}

fn searchable(candidates: &[VocabCandidate]) -> Vec<&VocabCandidate> {
    candidates.iter().filter(|c| c.is_searchable()).collect()
}

fn resolve_with<'c>(
    sentence: &str,
    candidates: impl IntoIterator<Item = &'c VocabCandidate>,
) -> Vec<MatchRange> {
    if sentence.is_empty() {
        return vec![];
    }
    let boundaries = CharBoundaries::new(sentence);
    let mut found = Vec::new();
    for candidate in candidates {
        let needle = candidate.surface_form.as_str();
        let needle_chars = needle.chars().count();
        for byte_start in occurrences(sentence, needle) {
            let start = boundaries.char_index(byte_start);
            found.push(MatchRange {
                start,
                end: start + needle_chars,
                candidate_index: candidate.index,
            });
        }
    }

    // Stable: equal (start, len) keeps candidate order.
    found.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.len().cmp(&a.len())));

    let mut accepted: Vec<MatchRange> = Vec::new();
    let mut cursor = 0;
    for range in found {
        if range.start >= cursor {
            cursor = range.end;
            accepted.push(range);
        }
    }
    accepted
}

/// Compute the highlight layout of one sentence.
///
/// Candidates with an empty or whitespace-only surface form are ignored.
/// The result is sorted by `start` and pairwise disjoint; a sentence with no
/// matches yields an empty `Vec`.  When two candidates share a surface form
/// the one earlier in `candidates` is kept, but callers should not rely on
/// which identical-text candidate wins.
pub fn resolve_spans(sentence: &str, candidates: &[VocabCandidate]) -> Vec<MatchRange> {
    resolve_with(sentence, searchable(candidates))
}

/// [`resolve_spans`] for every sentence of an article, filtering the shared
/// candidate list once.  The outer `Vec` is parallel to `sentences`.
pub fn resolve_article<S: AsRef<str>>(
    sentences: &[S],
    candidates: &[VocabCandidate],
) -> Vec<Vec<MatchRange>> {
    let candidates = searchable(candidates);
    sentences
        .iter()
        .map(|s| resolve_with(s.as_ref(), candidates.iter().copied()))
        .collect()
}

/// Cut `sentence` into alternating plain and highlighted segments.
///
/// With ranges from [`resolve_spans`] the segments cover the sentence
/// exactly once, in order.  Ranges that are empty, out of bounds, or overlap
/// an earlier accepted range are skipped so that a stale layout can never
/// break rendering.
pub fn segment_sentence<'a>(sentence: &'a str, ranges: &[MatchRange]) -> Vec<Segment<'a>> {
    let boundaries = CharBoundaries::new(sentence);
    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        if range.is_empty() || range.start < cursor || range.end > boundaries.char_count() {
            continue;
        }
        let (Some(start), Some(end), Some(plain_start)) = (
            boundaries.byte_offset(range.start),
            boundaries.byte_offset(range.end),
            boundaries.byte_offset(cursor),
        ) else {
            continue;
        };
        if plain_start < start {
            segments.push(Segment::Plain(&sentence[plain_start..start]));
        }
        segments.push(Segment::Highlight {
            text: &sentence[start..end],
            candidate_index: range.candidate_index,
        });
        cursor = range.end;
    }
    if let Some(rest) = boundaries.byte_offset(cursor) {
        if rest < sentence.len() {
            segments.push(Segment::Plain(&sentence[rest..]));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(forms: &[&str]) -> Vec<VocabCandidate> {
        forms
            .iter()
            .enumerate()
            .map(|(i, f)| VocabCandidate::new(*f, i))
            .collect()
    }

    fn triples(ranges: &[MatchRange]) -> Vec<(usize, usize, usize)> {
        ranges
            .iter()
            .map(|r| (r.start, r.end, r.candidate_index))
            .collect()
    }

    #[test]
    fn longest_match_wins_at_same_start() {
        let ranges = resolve_spans("東京都に行く", &candidates(&["東京", "東京都"]));
        assert_eq!(triples(&ranges), vec![(0, 3, 1)]);
    }

    #[test]
    fn no_match_is_empty() {
        let ranges = resolve_spans("今日は晴れです。", &candidates(&["雨"]));
        assert!(ranges.is_empty());
        assert_eq!(
            segment_sentence("今日は晴れです。", &ranges),
            vec![Segment::Plain("今日は晴れです。")]
        );
    }

    #[test]
    fn leftmost_match_beats_longer_later_match() {
        // 京都 starts at 1 and 東京 at 0: 東京 is accepted, 京都 overlaps it.
        let ranges = resolve_spans("東京都", &candidates(&["京都", "東京"]));
        assert_eq!(triples(&ranges), vec![(0, 2, 1)]);
    }

    #[test]
    fn every_occurrence_is_found() {
        let ranges = resolve_spans("雨、雨、雨", &candidates(&["雨"]));
        assert_eq!(triples(&ranges), vec![(0, 1, 0), (2, 3, 0), (4, 5, 0)]);
    }

    #[test]
    fn overlapping_occurrences_resolve_greedily() {
        // "ああ" occurs at 0, 1 and 2; only 0 and 2 survive.
        let ranges = resolve_spans("ああああ", &candidates(&["ああ"]));
        assert_eq!(triples(&ranges), vec![(0, 2, 0), (2, 4, 0)]);
    }

    #[test]
    fn blank_candidates_are_ignored() {
        let ranges = resolve_spans("a b", &candidates(&["", "  ", "b"]));
        assert_eq!(triples(&ranges), vec![(2, 3, 2)]);
    }

    #[test]
    fn matching_is_case_sensitive_and_literal() {
        assert!(resolve_spans("NHK news", &candidates(&["nhk"])).is_empty());
        let ranges = resolve_spans("a.b axb", &candidates(&["a.b"]));
        assert_eq!(triples(&ranges), vec![(0, 3, 0)]);
    }

    #[test]
    fn identical_surface_forms_keep_one_range() {
        let ranges = resolve_spans("政府が発表", &candidates(&["政府", "政府"]));
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].start, ranges[0].end), (0, 2));
    }

    #[test]
    fn empty_inputs() {
        assert!(resolve_spans("", &candidates(&["a"])).is_empty());
        assert!(resolve_spans("abc", &[]).is_empty());
        assert!(segment_sentence("", &[]).is_empty());
    }

    #[test]
    fn offsets_are_in_characters() {
        let ranges = resolve_spans("日本のGDPが増加", &candidates(&["GDP", "増加"]));
        assert_eq!(triples(&ranges), vec![(3, 6, 0), (7, 9, 1)]);
    }

    #[test]
    fn segments_cover_sentence() {
        let sentence = "政府は新しい経済対策を発表した。";
        let ranges = resolve_spans(sentence, &candidates(&["経済対策", "発表", "政府"]));
        let segments = segment_sentence(sentence, &ranges);
        assert_eq!(
            segments,
            vec![
                Segment::Highlight { text: "政府", candidate_index: 2 },
                Segment::Plain("は新しい"),
                Segment::Highlight { text: "経済対策", candidate_index: 0 },
                Segment::Plain("を"),
                Segment::Highlight { text: "発表", candidate_index: 1 },
                Segment::Plain("した。"),
            ]
        );
        let rebuilt: String = segments.iter().map(|s| s.text()).collect();
        assert_eq!(rebuilt, sentence);
    }

    #[test]
    fn segment_sentence_skips_bad_ranges() {
        let sentence = "abcdef";
        let ranges = [
            MatchRange { start: 1, end: 3, candidate_index: 0 },
            MatchRange { start: 2, end: 4, candidate_index: 1 },
            MatchRange { start: 4, end: 4, candidate_index: 2 },
            MatchRange { start: 5, end: 4, candidate_index: 4 },
            MatchRange { start: 5, end: 9, candidate_index: 3 },
        ];
        let segments = segment_sentence(sentence, &ranges);
        assert_eq!(
            segments,
            vec![
                Segment::Plain("a"),
                Segment::Highlight { text: "bc", candidate_index: 0 },
                Segment::Plain("def"),
            ]
        );
    }

    #[test]
    fn resolve_article_is_parallel_to_sentences() {
        let sentences = vec![
            String::from("東京で雨。"),
            String::from("晴れ。"),
            String::from("雨と東京。"),
        ];
        let layout = resolve_article(&sentences, &candidates(&["東京", "雨", " "]));
        assert_eq!(layout.len(), 3);
        assert_eq!(triples(&layout[0]), vec![(0, 2, 0), (3, 4, 1)]);
        assert!(layout[1].is_empty());
        assert_eq!(triples(&layout[2]), vec![(0, 1, 1), (2, 4, 0)]);
    }

    #[test]
    fn same_input_same_output() {
        let c = candidates(&["東京", "東京都", "都", "行く"]);
        let first = resolve_spans("東京都に行く", &c);
        for _ in 0..3 {
            assert_eq!(resolve_spans("東京都に行く", &c), first);
        }
    }
}
