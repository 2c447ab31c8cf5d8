use crate::checker::client::Match;
use std::ops::Range;

/// Resolution for a single reported match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Replace(String),
    Skip,
}

/// Apply the top-ranked suggestion of every match that has one.
///
/// Returns the corrected text and the number of edits spliced in.
pub fn apply_first_suggestions(text: &str, matches: &[Match]) -> (String, usize) {
    apply_with(text, matches, |m| {
        Decision::Replace(m.replacements[0].value.clone())
    })
}

/// Splice replacements into `text`, asking `decide` what to do with each
/// match that has at least one candidate.
///
/// Matches are processed by offset descending: an edit changes the length of
/// everything after its position but nothing before it, so offsets of
/// not-yet-processed matches stay valid without recomputation. A match whose
/// span reaches past the start of an already-applied edit would operate on
/// shifted text and is dropped; only a non-overlapping subset is ever
/// applied. Offsets and lengths count characters, not bytes.
pub fn apply_with<F>(text: &str, matches: &[Match], mut decide: F) -> (String, usize)
where
    F: FnMut(&Match) -> Decision,
{
    let mut ordered: Vec<&Match> = matches
        .iter()
        .filter(|m| !m.replacements.is_empty())
        .collect();
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut fixed = text.to_string();
    let mut applied = 0;
    // Character offset of the lowest edit applied so far.
    let mut floor = usize::MAX;

    for m in ordered {
        if m.offset.saturating_add(m.length) > floor {
            continue;
        }
        let Some(range) = byte_span(&fixed, m.offset, m.length) else {
            continue;
        };
        if let Decision::Replace(replacement) = decide(m) {
            fixed.replace_range(range, &replacement);
            applied += 1;
            floor = m.offset;
        }
    }

    (fixed, applied)
}

/// Convert a character offset and length into a byte range of `text`.
/// `None` when the span falls outside the text.
pub(crate) fn byte_span(text: &str, offset: usize, length: usize) -> Option<Range<usize>> {
    let start = byte_offset(text, offset)?;
    let end = start + byte_offset(&text[start..], length)?;
    Some(start..end)
}

fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    if chars == 0 {
        return Some(0);
    }
    let mut seen = 0;
    for (index, _) in text.char_indices() {
        if seen == chars {
            return Some(index);
        }
        seen += 1;
    }
    if seen == chars {
        Some(text.len())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::client::{MatchContext, Replacement};

    fn make_match(offset: usize, length: usize, replacements: &[&str]) -> Match {
        Match {
            message: "test issue".to_string(),
            offset,
            length,
            replacements: replacements
                .iter()
                .map(|value| Replacement {
                    value: value.to_string(),
                })
                .collect(),
            context: MatchContext {
                text: String::new(),
                offset: 0,
                length: 0,
            },
        }
    }

    #[test]
    fn test_no_matches_returns_input_unchanged() {
        let (fixed, applied) = apply_first_suggestions("nothing wrong here", &[]);
        assert_eq!(fixed, "nothing wrong here");
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_single_match_replaces_exact_span() {
        let matches = vec![make_match(4, 3, &["foo"])];
        let (fixed, applied) = apply_first_suggestions("abcdXYZefgh", &matches);
        assert_eq!(fixed, "abcdfooefgh");
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_readme_example() {
        let matches = vec![make_match(0, 3, &["This"])];
        let (fixed, _) = apply_first_suggestions("Ths is a test.", &matches);
        assert_eq!(fixed, "This is a test.");
    }

    #[test]
    fn test_descending_order_preserves_earlier_offsets() {
        // "teh cat adn dog": fix offsets 8 then 0; applying the higher
        // offset first must leave the lower one untouched.
        let matches = vec![make_match(0, 3, &["the"]), make_match(8, 3, &["and"])];
        let (fixed, applied) = apply_first_suggestions("teh cat adn dog", &matches);
        assert_eq!(fixed, "the cat and dog");
        assert_eq!(applied, 2);

        // Same result regardless of the order matches arrive in.
        let reversed = vec![make_match(8, 3, &["and"]), make_match(0, 3, &["the"])];
        let (fixed_rev, _) = apply_first_suggestions("teh cat adn dog", &reversed);
        assert_eq!(fixed_rev, fixed);
    }

    #[test]
    fn test_matches_equivalent_to_sequential_right_to_left() {
        let text = "aaa bbb ccc";
        let m1 = make_match(0, 3, &["X"]);
        let m2 = make_match(8, 3, &["YYYY"]);

        let (both, _) = apply_first_suggestions(text, &[m1.clone(), m2.clone()]);

        let (after_m2, _) = apply_first_suggestions(text, &[m2]);
        let (sequential, _) = apply_first_suggestions(&after_m2, &[m1]);

        assert_eq!(both, sequential);
        assert_eq!(both, "X bbb YYYY");
    }

    #[test]
    fn test_empty_candidate_list_is_skipped() {
        let matches = vec![make_match(0, 3, &[]), make_match(4, 2, &["was"])];
        let (fixed, applied) = apply_first_suggestions("Ths iz a test.", &matches);
        assert_eq!(fixed, "Ths was a test.");
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_length_change_shifts_only_suffix() {
        let matches = vec![make_match(2, 1, &["long replacement"])];
        let (fixed, _) = apply_first_suggestions("abXcd", &matches);
        assert_eq!(fixed, "ablong replacementcd");
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        // Cyrillic chars are two bytes each; offsets still count characters.
        let matches = vec![make_match(7, 3, &["мир"])];
        let (fixed, _) = apply_first_suggestions("Привет мер!", &matches);
        assert_eq!(fixed, "Привет мир!");
    }

    #[test]
    fn test_overlapping_matches_keep_highest_offset_edit() {
        // [2, 7) overlaps [4, 8): the higher-offset edit wins, the other
        // is dropped rather than splicing into shifted text.
        let matches = vec![make_match(2, 5, &["AAAA"]), make_match(4, 4, &["BB"])];
        let (fixed, applied) = apply_first_suggestions("0123456789", &matches);
        assert_eq!(fixed, "0123BB89");
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_adjacent_matches_both_apply() {
        // [0, 3) and [3, 6) touch but do not overlap.
        let matches = vec![make_match(0, 3, &["AB"]), make_match(3, 3, &["CD"])];
        let (fixed, applied) = apply_first_suggestions("xxxyyy", &matches);
        assert_eq!(fixed, "ABCD");
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_out_of_range_span_is_skipped() {
        let matches = vec![make_match(40, 3, &["nope"]), make_match(0, 3, &["The"])];
        let (fixed, applied) = apply_first_suggestions("Teh text.", &matches);
        assert_eq!(fixed, "The text.");
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_decisions_drive_interactive_application() {
        let matches = vec![
            make_match(0, 3, &["This", "Thus"]),
            make_match(9, 4, &["test"]),
        ];
        let (fixed, applied) = apply_with("Ths is a tset.", &matches, |m| {
            if m.offset == 0 {
                // second-ranked candidate, as a user picking "2" would get
                Decision::Replace(m.replacements[1].value.clone())
            } else {
                Decision::Skip
            }
        });
        assert_eq!(fixed, "Thus is a tset.");
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_skipped_match_leaves_span_untouched() {
        let matches = vec![make_match(0, 3, &["This"])];
        let (fixed, applied) = apply_with("Ths is a test.", &matches, |_| Decision::Skip);
        assert_eq!(fixed, "Ths is a test.");
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_replacement_at_end_of_text() {
        let matches = vec![make_match(5, 4, &["test"])];
        let (fixed, _) = apply_first_suggestions("some tset", &matches);
        assert_eq!(fixed, "some test");
    }

    #[test]
    fn test_byte_span_bounds() {
        assert_eq!(byte_span("hello", 0, 5), Some(0..5));
        assert_eq!(byte_span("hello", 5, 0), Some(5..5));
        assert_eq!(byte_span("hello", 4, 2), None);
        assert_eq!(byte_span("héllo", 1, 1), Some(1..3));
    }
}
