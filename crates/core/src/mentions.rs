//! Mention scanning and resolution for comment bodies.
//!
//! Pure functions, no I/O. A mention token is `@` followed by a maximal run
//! of non-whitespace, non-`@` characters. The literal token `All`
//! (case-sensitive) is a broadcast to every roster member except the actor;
//! any other token is matched case-insensitively against roster display
//! names. Unmatched tokens are ignored, and empty text yields an empty set.

use std::collections::BTreeSet;

use crate::roster::Member;
use crate::types::UserId;

/// Broadcast token: `@All` targets the whole roster minus the actor.
pub const BROADCAST_TOKEN: &str = "All";

/// Extract raw mention tokens (without the leading `@`) from `text`.
///
/// Tokens are maximal runs of non-whitespace, non-`@` characters; a bare
/// `@` yields nothing.
pub fn extract_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for span in mention_spans(text) {
        let token = &text[span.0 + 1..span.1];
        if !token.is_empty() {
            tokens.push(token);
        }
    }
    tokens
}

/// Resolve `@mention` tokens in `text` against `roster`.
///
/// Returns the de-duplicated set of mentioned member ids. Display-name
/// matching is case-insensitive with surrounding whitespace trimmed on the
/// roster side. `@All` adds every roster member except `actor_id`; the
/// actor can still be mentioned explicitly by name.
pub fn resolve_mentions(text: &str, roster: &[Member], actor_id: &str) -> BTreeSet<UserId> {
    let mut resolved = BTreeSet::new();
    let mut broadcast = false;

    for token in extract_tokens(text) {
        if token == BROADCAST_TOKEN {
            broadcast = true;
            continue;
        }
        let needle = token.to_lowercase();
        for member in roster {
            if member.display_name.trim().to_lowercase() == needle {
                resolved.insert(member.uid.clone());
            }
        }
    }

    if broadcast {
        for member in roster {
            if member.uid != actor_id {
                resolved.insert(member.uid.clone());
            }
        }
    }

    resolved
}

/// Remove every `@token` occurrence from `text` and trim the result.
///
/// Used to build preview snippets for notification messages.
pub fn strip_mentions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in mention_spans(text) {
        // A bare `@` (empty token) is kept as ordinary text.
        if span.1 - span.0 > 1 {
            out.push_str(&text[last..span.0]);
            last = span.1;
        }
    }
    out.push_str(&text[last..]);
    out.trim().to_string()
}

/// Byte spans `[start, end)` of each `@token` in `text`, including the `@`.
fn mention_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '@' {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(idx, next)) = chars.peek() {
            if next.is_whitespace() || next == '@' {
                break;
            }
            end = idx + next.len_utf8();
            chars.next();
        }
        spans.push((start, end));
    }

    spans
}
