use once_cell::sync::Lazy;
use regex::Regex;

/// Stripped guesses must be longer than this to match by containment
const MIN_PARTIAL_LEN: usize = 5;
pub const MAX_SUGGESTIONS: usize = 8;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

fn strip_punctuation(text: &str) -> String {
    NON_WORD.replace_all(text, "").trim().to_string()
}

/// Decide whether a free-text guess names the song.
///
/// Case and surrounding whitespace never matter, punctuation is ignored, and
/// a guess longer than five characters also counts when one title contains
/// the other ("blinding" vs "Blinding Lights").
pub fn is_correct(guess: &str, actual: &str) -> bool {
    let guess = guess.trim().to_lowercase();
    let actual = actual.trim().to_lowercase();

    if guess == actual {
        return true;
    }

    let guess = strip_punctuation(&guess);
    let actual = strip_punctuation(&actual);
    if guess == actual {
        return true;
    }

    guess.chars().count() > MIN_PARTIAL_LEN
        && (actual.contains(guess.as_str()) || guess.contains(actual.as_str()))
}

/// Titles from the pool containing the query, case-insensitively, in pool order
pub fn suggestions(query: &str, pool: &[String]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<String> = Vec::new();
    for title in pool {
        if found.len() == MAX_SUGGESTIONS {
            break;
        }
        if title.to_lowercase().contains(&query) && !found.contains(title) {
            found.push(title.clone());
        }
    }
    found
}
