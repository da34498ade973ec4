//! Approximate string matching (Bitap) with token averaging.
//!
//! Scores run from 0.0 (exact) to 1.0 (no match). A score combines how many
//! errors the match needed with how far from the start of the text it was
//! found:
//!
//! ```text
//! score = errors / pattern_len + |expected_location - found_location| / distance
//! ```
//!
//! With `tokenize`, the pattern is also split on spaces and each word is
//! searched on its own; the final score is the mean of the full-pattern
//! score and every word score. That ranks "blue whale" near "whale, blue"
//! while still favouring the text that matches the whole phrase.

use std::collections::HashMap;

/// Longest pattern the bit-parallel search handles; longer patterns are truncated.
pub const MAX_PATTERN_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    /// Where in the text the pattern is expected.
    pub location: usize,
    /// How far from `location` a match may drift before it scores 1.0.
    pub distance: usize,
    /// Matches scoring above this are rejected during the search.
    pub threshold: f64,
    pub tokenize: bool,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            location: 0,
            distance: 100,
            threshold: 0.6,
            tokenize: true,
        }
    }
}

/// A prepared search pattern.
struct Pattern {
    chars: Vec<char>,
    alphabet: HashMap<char, u64>,
    mask: u64,
}

impl Pattern {
    fn new(text: &str) -> Option<Self> {
        let chars: Vec<char> = text.to_lowercase().chars().take(MAX_PATTERN_LEN).collect();
        if chars.is_empty() {
            return None;
        }
        let len = chars.len();
        let mut alphabet: HashMap<char, u64> = HashMap::new();
        for (i, c) in chars.iter().enumerate() {
            *alphabet.entry(*c).or_insert(0) |= 1 << (len - i - 1);
        }
        Some(Self {
            chars,
            alphabet,
            mask: 1 << (len - 1),
        })
    }

    fn len(&self) -> usize {
        self.chars.len()
    }
}

/// Scores `text` against `pattern` with the default matcher.
/// None means no acceptable match.
pub fn score(pattern: &str, text: &str) -> Option<f64> {
    Matcher::default().score(pattern, text)
}

impl Matcher {
    pub fn score(&self, pattern: &str, text: &str) -> Option<f64> {
        let full = Pattern::new(pattern)?;
        let text: Vec<char> = text.to_lowercase().chars().collect();

        let total = if self.tokenize {
            let words: Vec<Pattern> = pattern.split(' ').filter_map(Pattern::new).collect();
            let sum = words
                .iter()
                .fold(self.bitap(&full, &text), |acc, word| acc + self.bitap(word, &text));
            sum / (words.len() + 1) as f64
        } else {
            self.bitap(&full, &text)
        };

        if total >= 1.0 { None } else { Some(total) }
    }

    fn calculate_score(&self, pattern_len: usize, errors: usize, loc: usize) -> f64 {
        let accuracy = errors as f64 / pattern_len as f64;
        let proximity = self.location.abs_diff(loc);
        if self.distance == 0 {
            return if proximity != 0 { 1.0 } else { accuracy };
        }
        accuracy + proximity as f64 / self.distance as f64
    }

    /// Best score for one pattern over the whole text; 1.0 if nothing matched.
    fn bitap(&self, pattern: &Pattern, text: &[char]) -> f64 {
        let pattern_len = pattern.len();
        let text_len = text.len();

        if pattern.chars.as_slice() == text {
            return 0.0;
        }

        let mut threshold = self.threshold;
        // An exact substring bounds how bad a fuzzy match may be.
        if let Some(found) = find_from(text, &pattern.chars, self.location) {
            threshold = threshold.min(self.calculate_score(pattern_len, 0, found));
        }

        let mut best_score = 1.0;
        let mut bin_max = pattern_len + text_len;
        let mut last_bits: Vec<u64> = Vec::new();

        for errors in 0..pattern_len {
            // Binary search for how far from `location` this error level may reach.
            let mut bin_min = 0;
            let mut bin_mid = bin_max;
            while bin_min < bin_mid {
                if self.calculate_score(pattern_len, errors, self.location + bin_mid) <= threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            bin_max = bin_mid;

            let mut start = (self.location + 1).saturating_sub(bin_mid).max(1);
            let finish = (self.location + bin_mid).min(text_len) + pattern_len;

            let mut bits = vec![0u64; finish + 2];
            bits[finish + 1] = (1u64 << errors) - 1;

            let mut j = finish;
            while j >= start {
                let current = j - 1;
                let char_match = text
                    .get(current)
                    .and_then(|c| pattern.alphabet.get(c))
                    .copied()
                    .unwrap_or(0);

                bits[j] = ((bits[j + 1] << 1) | 1) & char_match;
                if errors > 0 {
                    bits[j] |=
                        (((last_bits[j + 1] | last_bits[j]) << 1) | 1) | last_bits[j + 1];
                }

                if bits[j] & pattern.mask != 0 {
                    let candidate = self.calculate_score(pattern_len, errors, current);
                    if candidate <= threshold {
                        threshold = candidate;
                        best_score = candidate;
                        if current > self.location {
                            // Don't drift further from `location` than this match.
                            start = (2 * self.location).saturating_sub(current).max(1);
                        } else {
                            break;
                        }
                    }
                }
                j -= 1;
            }

            // More errors can only score worse from here.
            if self.calculate_score(pattern_len, errors + 1, self.location) > threshold {
                break;
            }
            last_bits = bits;
        }

        best_score
    }
}

fn find_from(text: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > text.len() || from > text.len() - needle.len() {
        return None;
    }
    (from..=text.len() - needle.len()).find(|&i| text[i..i + needle.len()] == *needle)
}
