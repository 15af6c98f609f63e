//! Extraction of bracketed RGB groups from free-form generated text.
//!
//! The generation service is only loosely instructed to answer with
//! `[[R, G, B], [R, G, B], [R, G, B]]`; in practice it wraps the answer in prose,
//! markdown or reasoning. This module scans for the first three `[d, d, d]`
//! groups and ignores everything else. It is a pure function over a string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::ColorTriple;

/// Number of seed colors the pipeline requires.
pub const SEED_COUNT: usize = 3;

/// `[d{1,3}, d{1,3}, d{1,3}]` with at most one whitespace after each comma.
static RGB_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([0-9]{1,3}),\s?([0-9]{1,3}),\s?([0-9]{1,3})\]")
        .expect("Invalid RGB group regex")
});

/// Every bracketed RGB group in `text`, in source order.
///
/// Numeric range is not checked; `[300, 0, 9]` yields a triple with red = 300.
pub fn extract_all(text: &str) -> Vec<ColorTriple> {
    RGB_GROUP
        .captures_iter(text)
        .filter_map(|caps| {
            let channel = |i: usize| caps.get(i)?.as_str().parse::<u16>().ok();
            Some(ColorTriple::new(channel(1)?, channel(2)?, channel(3)?))
        })
        .collect()
}

/// The first three RGB groups in `text`, or `None` if there are fewer than three.
///
/// Never returns a partial result: one or two matches count as a total failure.
pub fn extract_colors(text: &str) -> Option<[ColorTriple; SEED_COUNT]> {
    let found = extract_all(text);
    if found.len() < SEED_COUNT {
        tracing::debug!(matches = found.len(), "Too few RGB groups in generated text");
        return None;
    }
    if found.len() > SEED_COUNT {
        tracing::trace!(
            matches = found.len(),
            "Ignoring RGB groups beyond the first {}",
            SEED_COUNT
        );
    }
    Some([found[0], found[1], found[2]])
}
