use kiji_rs::highlighter::{resolve_spans, segment_sentence, Segment, VocabCandidate};
use kiji_rs::segmenter::{normalize_content, segment, split_sentences};
use proptest::prelude::*;

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Short strings over a small alphabet so candidates actually collide.
fn sentence_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec!['東', '京', '都', 'に', '行', 'く', '。', 'a', 'b', ' ']),
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn candidates_strategy() -> impl Strategy<Value = Vec<VocabCandidate>> {
    proptest::collection::vec(
        proptest::collection::vec(
            prop::sample::select(vec!['東', '京', '都', 'に', '行', 'a', 'b']),
            0..4,
        ),
        0..6,
    )
    .prop_map(|forms| {
        forms
            .into_iter()
            .enumerate()
            .map(|(i, chars)| VocabCandidate::new(chars.into_iter().collect::<String>(), i))
            .collect()
    })
}

fn content_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec!["雨です。", "寒い！", "本当？", "Hi. ", "\n", "\n\n", " ", "【見出し】"]),
        0..16,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn normalize_content_is_idempotent(raw in content_strategy()) {
        let once = normalize_content(&raw);
        prop_assert_eq!(normalize_content(&once), once.clone());
        prop_assert!(!once.contains("\n\n\n"));
    }

    #[test]
    fn segmentation_preserves_text(raw in content_strategy()) {
        let content = normalize_content(&raw);
        let segmentation = segment(&content);
        prop_assert_eq!(
            strip_whitespace(&segmentation.paragraphs.concat()),
            strip_whitespace(&content)
        );
        prop_assert_eq!(
            strip_whitespace(&segmentation.sentences.concat()),
            strip_whitespace(&content)
        );
        prop_assert!(segmentation.sentences.iter().all(|s| !s.trim().is_empty()));
        for paragraph in &segmentation.paragraphs {
            prop_assert_eq!(
                strip_whitespace(&split_sentences(paragraph).concat()),
                strip_whitespace(paragraph)
            );
        }
    }

    #[test]
    fn resolved_ranges_are_sorted_disjoint_and_literal(
        sentence in sentence_strategy(),
        candidates in candidates_strategy(),
    ) {
        let ranges = resolve_spans(&sentence, &candidates);
        let chars: Vec<char> = sentence.chars().collect();
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
        for range in &ranges {
            prop_assert!(range.start < range.end);
            prop_assert!(range.end <= chars.len());
            let surface: String = chars[range.start..range.end].iter().collect();
            let candidate = candidates
                .iter()
                .find(|c| c.index == range.candidate_index);
            prop_assert!(candidate.is_some());
            prop_assert_eq!(&surface, &candidate.map(|c| c.surface_form.clone()).unwrap_or_default());
        }
    }

    #[test]
    fn segments_cover_the_sentence(
        sentence in sentence_strategy(),
        candidates in candidates_strategy(),
    ) {
        let ranges = resolve_spans(&sentence, &candidates);
        let segments = segment_sentence(&sentence, &ranges);
        let rebuilt: String = segments.iter().map(|s| s.text()).collect();
        prop_assert_eq!(rebuilt, sentence.clone());
        let highlighted = segments
            .iter()
            .filter(|s| matches!(s, Segment::Highlight { .. }))
            .count();
        prop_assert_eq!(highlighted, ranges.len());
    }
}
