//! Shared candidate ranking for the time-windowed session stores.

use std::collections::HashMap;

use crate::sessions::types::{SessionInfo, SessionSearchOptions};

/// Select the most plausible candidate under the search options.
///
/// Candidates are filtered by the inclusive `since`/`until` bounds. When
/// `prefer_closest_to` is set, distance-based ordering is used - but only if
/// at least one candidate falls within `window_ms` of the preferred time.
/// Otherwise ordering falls back to newest-first, so a stale session is
/// never picked merely for being numerically "closest" when nothing is
/// actually nearby. Distance ties break newest-first.
pub fn select_candidate(
    candidates: Vec<SessionInfo>,
    options: &SessionSearchOptions,
) -> Option<SessionInfo> {
    let mut filtered: Vec<SessionInfo> = dedupe_by_id(candidates)
        .into_iter()
        .filter(|c| options.since.is_none_or(|since| c.mtime >= since))
        .filter(|c| options.until.is_none_or(|until| c.mtime <= until))
        .collect();

    if filtered.is_empty() {
        return None;
    }

    if let Some(preferred) = options.prefer_closest_to {
        let window_ms = options.effective_window_ms();
        let distance =
            |c: &SessionInfo| c.mtime.signed_duration_since(preferred).num_milliseconds().abs();

        if filtered.iter().any(|c| distance(c) <= window_ms) {
            filtered.sort_by(|a, b| {
                distance(a)
                    .cmp(&distance(b))
                    .then_with(|| b.mtime.cmp(&a.mtime))
            });
            return filtered.into_iter().next();
        }
    }

    filtered.sort_by(|a, b| b.mtime.cmp(&a.mtime));
    filtered.into_iter().next()
}

/// Collapse duplicate ids (the same session found via several roots or
/// encodings), keeping the newest mtime per id.
fn dedupe_by_id(candidates: Vec<SessionInfo>) -> Vec<SessionInfo> {
    let mut newest: HashMap<String, SessionInfo> = HashMap::new();
    for candidate in candidates {
        match newest.get(&candidate.id) {
            Some(existing) if existing.mtime >= candidate.mtime => {}
            _ => {
                newest.insert(candidate.id.clone(), candidate);
            }
        }
    }
    newest.into_values().collect()
}
