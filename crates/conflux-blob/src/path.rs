//! Slot path layout.
//!
//! A slot path is `[folder/]key/source`. Objects live one level below the
//! slot, named by content digest, so a full object name reads
//! `[folder/]key/source/<digest>`.

use conflux_store::{StoreError, StoreResult};

/// Join the optional folder and the given segments with `/`, trimming
/// stray slashes from each component.
pub fn compose_path(folder: Option<&str>, segments: &[&str]) -> String {
    let mut components: Vec<&str> = Vec::with_capacity(segments.len() + 1);
    if let Some(folder) = folder {
        components.push(folder.trim_matches('/'));
    }
    for segment in segments {
        components.push(segment.trim_matches('/'));
    }
    components.join("/")
}

/// Recover `(key, source)` from a slot path or a delimited listing prefix.
///
/// Accepts anything ending in `.../key/source` or `.../key/source/`; the
/// folder part, if any, is ignored. Shorter paths are malformed.
pub fn parse_path(path: &str) -> StoreResult<(String, String)> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let split: Vec<&str> = trimmed.split('/').collect();
    if split.len() < 2 || split.iter().any(|segment| segment.is_empty()) {
        return Err(StoreError::MalformedPath {
            path: path.to_owned(),
        });
    }
    let source = split[split.len() - 1].to_owned();
    let key = split[split.len() - 2].to_owned();
    Ok((key, source))
}
