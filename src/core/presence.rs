use crate::domain::model::{PresenceEntry, ViewerSummary};
use std::collections::HashMap;

/// Collapses realtime connections into one summary per user.
///
/// A user with several tabs open counts once; they are away only when every
/// connection is away.
pub fn aggregate_viewers(entries: &[PresenceEntry]) -> Vec<ViewerSummary> {
    let mut order: Vec<ViewerSummary> = Vec::new();
    let mut by_user: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let Some(user_id) = entry.user.id.as_deref() else {
            continue;
        };
        match by_user.get(user_id) {
            Some(&pos) => {
                let summary = &mut order[pos];
                summary.presence_count += 1;
                if !entry.away {
                    summary.away = false;
                }
            }
            None => {
                by_user.insert(user_id, order.len());
                order.push(ViewerSummary {
                    user: entry.user.clone(),
                    online_at: entry.online_at,
                    away: entry.away,
                    presence_count: 1,
                });
            }
        }
    }

    order
}
