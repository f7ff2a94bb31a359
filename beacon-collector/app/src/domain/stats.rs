use super::StoredEvent;
use beacon_event::EventKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const TOP_SCREENS: usize = 10;

/// One group of an aggregate count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: u64,
}

impl CountBucket {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: u64,
    pub by_type: Vec<CountBucket>,
    pub by_screen: Vec<CountBucket>,
    pub by_variant: Vec<CountBucket>,
    /// Mean render time over RENDER_TIME events; 0 when there are none.
    pub avg_render_time: f64,
}

/// Sorts by count descending then key ascending, keeping at most `limit`.
pub fn rank(counts: HashMap<String, u64>, limit: Option<usize>) -> Vec<CountBucket> {
    let mut buckets: Vec<_> = counts
        .into_iter()
        .map(|(key, count)| CountBucket { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    if let Some(limit) = limit {
        buckets.truncate(limit);
    }
    buckets
}

impl EventStats {
    /// Aggregates over events already narrowed to the wanted date range.
    pub fn compute<'a>(events: impl IntoIterator<Item = &'a StoredEvent>) -> Self {
        let mut total = 0u64;
        let mut by_type: HashMap<String, u64> = HashMap::new();
        let mut by_screen: HashMap<String, u64> = HashMap::new();
        let mut by_variant: HashMap<String, u64> = HashMap::new();
        let mut render_sum = 0.0;
        let mut render_samples = 0u64;

        for stored in events {
            let event = &stored.event;
            total += 1;
            *by_type.entry(event.kind.to_string()).or_default() += 1;
            if let Some(screen) = &event.screen_name {
                *by_screen.entry(screen.clone()).or_default() += 1;
            }
            if let Some(variant) = event.variant {
                *by_variant.entry(variant.to_string()).or_default() += 1;
            }
            if event.kind == EventKind::RenderTime
                && let Some(ms) = event.render_time_ms
            {
                render_sum += ms;
                render_samples += 1;
            }
        }

        Self {
            total_events: total,
            by_type: rank(by_type, None),
            by_screen: rank(by_screen, Some(TOP_SCREENS)),
            by_variant: rank(by_variant, None),
            avg_render_time: if render_samples == 0 {
                0.0
            } else {
                render_sum / render_samples as f64
            },
        }
    }
}
