//! Spelling correction for option keys.
//!
//! Candidates are generated by single-character edits (delete, adjacent
//! transpose, replace, insert) over printable ASCII, and kept only when they
//! appear in the dictionary. Distance-1 candidates are searched exhaustively;
//! the distance-2 search runs against a wall-clock budget.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Budget for a single distance-2 search.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Characters used for replacements and insertions (printable ASCII, no space).
const ALPHABET: std::ops::RangeInclusive<u8> = 33..=126;

/// Finds dictionary words within edit distance 2 of a query.
///
/// The dictionary is fixed at construction. Each query measures its own
/// deadline, so one `Suggester` may be shared across threads.
#[derive(Debug, Clone)]
pub struct Suggester {
    dictionary: BTreeSet<String>,
    timeout: Duration,
}

impl Suggester {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dictionary: words.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dictionary(&self) -> &BTreeSet<String> {
        &self.dictionary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// All dictionary words within distance 2 of `word`.
    ///
    /// Distance-1 matches are always complete. Distance-2 matches are those
    /// found before the timeout elapsed.
    pub fn corrections(&self, word: &str) -> BTreeSet<String> {
        if self.dictionary.is_empty() {
            return BTreeSet::new();
        }

        let edits = edits1(word);
        let mut result = self.known(&edits);

        let started = Instant::now();
        for edit in &edits {
            result.extend(self.known_edits1(edit));
            if started.elapsed() >= self.timeout {
                tracing::debug!(word, found = result.len(), "correction search timed out");
                break;
            }
        }

        result
    }

    /// A single correction for `word`, preferring distance-1 matches.
    ///
    /// Ties resolve to the lexicographically smallest word, so the answer is
    /// deterministic for a given dictionary. Returns `None` when nothing was
    /// found within the time budget.
    pub fn one_correction(&self, word: &str) -> Option<String> {
        if self.dictionary.is_empty() {
            return None;
        }

        let edits = edits1(word);
        if let Some(found) = self.known(&edits).into_iter().next() {
            return Some(found);
        }

        let started = Instant::now();
        for edit in &edits {
            if let Some(found) = self.known_edits1(edit).into_iter().next() {
                return Some(found);
            }
            if started.elapsed() >= self.timeout {
                tracing::debug!(word, "single correction search timed out");
                return None;
            }
        }

        None
    }

    fn known(&self, words: &BTreeSet<String>) -> BTreeSet<String> {
        words
            .iter()
            .filter(|w| self.dictionary.contains(w.as_str()))
            .cloned()
            .collect()
    }

    // Same as `known(&edits1(word))` without materializing every edit.
    fn known_edits1(&self, word: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for_each_edit1(word, |candidate| {
            if self.dictionary.contains(candidate) {
                found.insert(candidate.to_string());
            }
        });
        found
    }
}

/// Every string one edit away from `word`, in lexicographic order.
pub fn edits1(word: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for_each_edit1(word, |candidate| {
        out.insert(candidate.to_string());
    });
    out
}

/// Visit each distance-1 edit of `word`. Duplicates may be visited more than once.
///
/// Splits are taken at every char position `i` in `0..len`, so an edit always
/// has a non-empty right half to work on.
fn for_each_edit1(word: &str, mut visit: impl FnMut(&str)) {
    let chars: Vec<char> = word.chars().collect();
    let mut buf = String::with_capacity(word.len() + 1);

    for i in 0..chars.len() {
        let (left, right) = chars.split_at(i);

        // delete
        buf.clear();
        buf.extend(left);
        buf.extend(&right[1..]);
        visit(&buf);

        // transpose
        if right.len() >= 2 {
            buf.clear();
            buf.extend(left);
            buf.push(right[1]);
            buf.push(right[0]);
            buf.extend(&right[2..]);
            visit(&buf);
        }

        for c in ALPHABET.map(char::from) {
            // replace
            buf.clear();
            buf.extend(left);
            buf.push(c);
            buf.extend(&right[1..]);
            visit(&buf);

            // insert
            buf.clear();
            buf.extend(left);
            buf.push(c);
            buf.extend(right);
            visit(&buf);
        }
    }
}
