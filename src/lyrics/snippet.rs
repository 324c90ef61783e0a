use rand::Rng;
use std::collections::VecDeque;

/// Placeholder shown when no usable lyric line exists
pub const NOT_FOUND_SNIPPET: &str = "Lyrics not found.";

/// Lines with this many words or fewer get the following line appended
const SHORT_LINE_WORDS: usize = 6;
const MIN_WORDS: usize = 4;
const HINT_RESERVE: usize = 4;
const BOILERPLATE: [&str; 3] = ["Lyrics", "Contributor", "Embed"];

/// A quiz prompt cut from a song's lyrics, plus lines held back for hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricSnippet {
    pub text: String,
    pub hints: VecDeque<String>,
}

impl LyricSnippet {
    pub fn not_found() -> Self {
        Self {
            text: NOT_FOUND_SNIPPET.to_string(),
            hints: VecDeque::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.text == NOT_FOUND_SNIPPET
    }
}

pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// True when a trimmed line is fit to be shown as a prompt: no section
/// markers, no bracketed or parenthetical asides, no page boilerplate,
/// and more than four words.
pub fn is_clean_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && !line.starts_with('[')
        && !line.ends_with(']')
        && !line.starts_with('(')
        && !line.ends_with(')')
        && word_count(line) > MIN_WORDS
        && !BOILERPLATE.iter().any(|marker| line.contains(marker))
}

pub fn clean_lines(lyrics: &str) -> Vec<&str> {
    lyrics
        .split('\n')
        .map(str::trim)
        .filter(|line| is_clean_line(line))
        .collect()
}

pub fn select_snippet(lyrics: &str) -> LyricSnippet {
    select_snippet_with(lyrics, &mut rand::thread_rng())
}

/// Pick a random clean line as the prompt. The next four clean lines,
/// wrapping around the end of the song, become the hint reserve. A short
/// prompt borrows the first reserve line.
pub fn select_snippet_with<R: Rng>(lyrics: &str, rng: &mut R) -> LyricSnippet {
    let clean = clean_lines(lyrics);

    match clean.len() {
        0 => LyricSnippet::not_found(),
        1 => LyricSnippet {
            text: clean[0].to_string(),
            hints: VecDeque::new(),
        },
        count => {
            let start = rng.gen_range(0..count);
            let mut hints: VecDeque<String> = (1..=HINT_RESERVE)
                .map(|offset| clean[(start + offset) % count].to_string())
                .collect();

            let mut text = clean[start].to_string();
            if word_count(&text) <= SHORT_LINE_WORDS {
                let next = clean[(start + 1) % count];
                text = format!("{text}\n{next}");
                hints.pop_front();
            }

            LyricSnippet { text, hints }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SONG: &str = "\
12 ContributorsChihiro Lyrics
[Verse 1]
Tell me, tell me, do you want me around
Or am I just a passing thought you had tonight
(Ooh, ooh)
Short line here

[Chorus]
I know you want me to be somebody I am not
Keep your eyes open while the city goes to sleep tonight
Embed";

    fn every_start(lyrics: &str) -> Vec<LyricSnippet> {
        (0..64)
            .map(|seed| select_snippet_with(lyrics, &mut StdRng::seed_from_u64(seed)))
            .collect()
    }

    #[test]
    fn test_is_clean_line() {
        assert!(is_clean_line("Tell me, tell me, do you want"));
        assert!(is_clean_line("   padded line with five words   "));

        assert!(!is_clean_line(""));
        assert!(!is_clean_line("    "));
        assert!(!is_clean_line("[Verse 1: Someone Someone Else]"));
        assert!(!is_clean_line("[Chorus with many words in it"));
        assert!(!is_clean_line("lots of words and then a bracket]"));
        assert!(!is_clean_line("(Ooh, ooh, ooh, ooh, ooh)"));
        assert!(!is_clean_line("some words trailing into an aside (yeah)"));
        assert!(!is_clean_line("only four words here"));
        assert!(!is_clean_line("12 Contributors and many more words"));
        assert!(!is_clean_line("Chihiro Lyrics by Billie Eilish today"));
        assert!(!is_clean_line("You might also like this Embed"));
    }

    #[test]
    fn test_boilerplate_match_is_case_sensitive() {
        assert!(is_clean_line("these lyrics are written in lowercase"));
        assert!(is_clean_line("we embed ourselves in the night"));
    }

    #[test]
    fn test_clean_lines_filters_and_trims() {
        let lines = clean_lines(SONG);
        assert_eq!(
            lines,
            vec![
                "Tell me, tell me, do you want me around",
                "Or am I just a passing thought you had tonight",
                "I know you want me to be somebody I am not",
                "Keep your eyes open while the city goes to sleep tonight",
            ]
        );
    }

    #[test]
    fn test_no_clean_lines_is_not_found() {
        for lyrics in ["", "\n\n", "[Intro]\n(Ooh)\nshort\nSong Lyrics are here now\n1 Contributor"] {
            let snippet = select_snippet(lyrics);
            assert!(snippet.is_not_found());
            assert_eq!(snippet.text, NOT_FOUND_SNIPPET);
            assert!(snippet.hints.is_empty());
        }
    }

    #[test]
    fn test_single_clean_line_has_no_hints() {
        let snippet = select_snippet("[Intro]\nthe only line long enough here\n(yeah)");
        assert_eq!(snippet.text, "the only line long enough here");
        assert!(snippet.hints.is_empty());
    }

    #[test]
    fn test_single_short_clean_line_is_not_merged() {
        let snippet = select_snippet("just five words in this");
        assert_eq!(snippet.text, "just five words in this");
        assert!(snippet.hints.is_empty());
    }

    #[test]
    fn test_snippet_lines_are_always_clean() {
        for snippet in every_start(SONG) {
            for line in snippet.text.lines() {
                assert!(is_clean_line(line), "unclean line in snippet: {line:?}");
            }
            for hint in &snippet.hints {
                assert!(is_clean_line(hint));
            }
        }
    }

    #[test]
    fn test_long_line_keeps_four_hints_with_wraparound() {
        let lyrics = "\
line number one has exactly eight words here
line number two has exactly eight words here
line number three has exactly eight words too";

        for snippet in every_start(lyrics) {
            let clean = clean_lines(lyrics);
            let start = clean
                .iter()
                .position(|line| *line == snippet.text)
                .expect("prompt is a single clean line");

            let expected: Vec<String> = (1..=4)
                .map(|offset| clean[(start + offset) % clean.len()].to_string())
                .collect();
            assert_eq!(Vec::from(snippet.hints.clone()), expected);
        }
    }

    #[test]
    fn test_short_line_is_merged_with_next() {
        let lyrics = "\
five words on this line
another line that has quite a few words
third line that also has plenty of words";

        let merged: Vec<LyricSnippet> = every_start(lyrics)
            .into_iter()
            .filter(|s| s.text.starts_with("five words"))
            .collect();
        assert!(!merged.is_empty(), "seeds never picked the short line");

        for snippet in merged {
            assert_eq!(
                snippet.text,
                "five words on this line\nanother line that has quite a few words"
            );
            // the merged line left the reserve, the wrapped tail remains
            assert_eq!(
                Vec::from(snippet.hints),
                vec![
                    "third line that also has plenty of words".to_string(),
                    "five words on this line".to_string(),
                    "another line that has quite a few words".to_string(),
                ]
            );
        }
    }

    #[test]
    fn test_six_word_line_is_merged_seven_is_not() {
        let six = "one two three four five six\nseven words on the second line here";
        let seven = "one two three four five six seven\neight words on the second line right here";

        for snippet in every_start(six) {
            if snippet.text.starts_with("one") {
                assert_eq!(snippet.text.lines().count(), 2);
                assert_eq!(snippet.hints.len(), 3);
            }
        }
        for snippet in every_start(seven) {
            assert_eq!(snippet.text.lines().count(), 1);
            assert_eq!(snippet.hints.len(), 4);
        }
    }

    #[test]
    fn test_start_index_covers_every_line() {
        let starts: std::collections::HashSet<String> =
            every_start(SONG).into_iter().map(|s| s.text).collect();
        assert_eq!(starts.len(), 4);
    }

    #[test]
    fn test_windows_line_endings_are_trimmed() {
        let snippet = select_snippet("a line with windows line endings\r\n[Outro]\r\n");
        assert_eq!(snippet.text, "a line with windows line endings");
    }
}
