//! Last-write-wins reconciliation for collaborative whiteboard elements.
//!
//! Ordering between two copies of the same element:
//! - higher `version` wins;
//! - on equal `version`, lower `version_nonce` wins.
//!
//! Both functions are pure; persistence and broadcasting belong to the caller.

use crate::domain::model::{Element, ElementChanges};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Returns true when `candidate` should replace `current`.
pub fn supersedes(candidate: &Element, current: &Element) -> bool {
    match candidate.version.cmp(&current.version) {
        Ordering::Greater => true,
        Ordering::Equal => candidate.version_nonce < current.version_nonce,
        Ordering::Less => false,
    }
}

/// Merges a remote snapshot into the local one.
///
/// Local order is kept (winners replace in place), remote-only elements are
/// appended in remote order.
pub fn merge_elements(local: &[Element], remote: &[Element]) -> Vec<Element> {
    let mut merged: Vec<Element> = Vec::with_capacity(local.len() + remote.len());
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(merged.capacity());

    for element in local.iter().chain(remote) {
        match positions.get(element.id.as_str()) {
            Some(&pos) => {
                if supersedes(element, &merged[pos]) {
                    merged[pos] = element.clone();
                }
            }
            None => {
                positions.insert(element.id.as_str(), merged.len());
                merged.push(element.clone());
            }
        }
    }

    tracing::debug!(
        local = local.len(),
        remote = remote.len(),
        merged = merged.len(),
        "merged whiteboard elements"
    );
    merged
}

/// Computes what changed between two snapshots of the same scene.
pub fn diff_elements(previous: &[Element], current: &[Element]) -> ElementChanges {
    let before: HashMap<&str, &Element> = previous.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(current.len());
    let mut removed: HashSet<&str> = HashSet::new();
    let mut changes = ElementChanges::default();

    for element in current {
        if !seen.insert(element.id.as_str()) {
            continue;
        }
        match before.get(element.id.as_str()) {
            None => {
                if !element.is_deleted {
                    changes.inserted.push(element.clone());
                }
            }
            Some(old) => {
                if element.is_deleted {
                    if !old.is_deleted && removed.insert(element.id.as_str()) {
                        changes.deleted.push(element.id.clone());
                    }
                } else if old.version != element.version
                    || old.version_nonce != element.version_nonce
                {
                    changes.updated.push(element.clone());
                }
            }
        }
    }

    for old in previous {
        if !seen.contains(old.id.as_str()) && !old.is_deleted && removed.insert(old.id.as_str()) {
            changes.deleted.push(old.id.clone());
        }
    }

    changes
}

/// Elements that are not soft-deleted, in their original order.
pub fn live_elements(elements: &[Element]) -> Vec<Element> {
    elements.iter().filter(|e| !e.is_deleted).cloned().collect()
}
