// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version-string ordering and filename sanitization.
//!
//! "Latest" is the maximum under natural ordering: version strings are
//! compared segment-wise, with runs of digits comparing numerically and
//! everything else comparing lexicographically, so `r10` sorts after `r9`
//! and `1.10` after `1.2`.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Number(u64),
    Text(&'a str),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            let (num, tail) = rest.split_at(digits);
            // Overlong digit runs fall back to text comparison
            match num.parse::<u64>() {
                Ok(n) => out.push(Segment::Number(n)),
                Err(_) => out.push(Segment::Text(num)),
            }
            rest = tail;
        } else {
            let text = rest.chars().take_while(|c| !c.is_ascii_digit()).count();
            let split = rest
                .char_indices()
                .nth(text)
                .map_or(rest.len(), |(i, _)| i);
            let (txt, tail) = rest.split_at(split);
            out.push(Segment::Text(txt));
            rest = tail;
        }
    }
    out
}

/// Compare two version strings under natural ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    let (sa, sb) = (segments(a), segments(b));
    for pair in sa.iter().zip(sb.iter()) {
        let ord = match pair {
            (Segment::Number(x), Segment::Number(y)) => x.cmp(y),
            (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            // Numbered releases sort after bare text (e.g. "r1" > "r")
            (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    sa.len().cmp(&sb.len())
}

/// Sanitize a version string for use as a filename stem.
///
/// Anything outside `[A-Za-z0-9_-]` becomes `_`, matching how stored
/// version names are reported by listings.
pub fn sanitize(version: &str) -> String {
    version
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
