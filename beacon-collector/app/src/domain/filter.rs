use super::StoredEvent;
use beacon_event::{EventKind, Variant};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Inclusive bounds on ingestion time. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| *at >= start) && self.end.is_none_or(|end| *at <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub kind: Option<EventKind>,
    pub screen_name: Option<String>,
    pub variant: Option<Variant>,
    pub range: DateRange,
}

impl EventFilter {
    pub fn matches(&self, stored: &StoredEvent) -> bool {
        let event = &stored.event;
        self.kind.is_none_or(|kind| event.kind == kind)
            && self
                .screen_name
                .as_deref()
                .is_none_or(|screen| event.screen_name.as_deref() == Some(screen))
            && self.variant.is_none_or(|variant| event.variant == Some(variant))
            && self.range.contains(&stored.created_at)
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: Page, total: u64) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            pages: total.div_ceil(u64::from(page.limit.max(1))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_event::TelemetryEvent;
    use chrono::TimeZone;

    #[test]
    fn range_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let range = DateRange {
            start: Some(start),
            end: Some(end),
        };
        assert!(range.contains(&start));
        assert!(range.contains(&end));
        assert!(!range.contains(&(end + chrono::Duration::milliseconds(1))));
        assert!(DateRange::default().contains(&start));
    }

    #[test]
    fn filter_matches_all_criteria() {
        let stored = StoredEvent::new(TelemetryEvent::screen_view("Home", Some(Variant::A)));
        let filter = EventFilter {
            kind: Some(EventKind::ScreenView),
            screen_name: Some("Home".to_string()),
            variant: Some(Variant::A),
            range: DateRange::default(),
        };
        assert!(filter.matches(&stored));

        let other_screen = EventFilter {
            screen_name: Some("Profile".to_string()),
            ..filter.clone()
        };
        assert!(!other_screen.matches(&stored));

        let other_variant = EventFilter {
            variant: Some(Variant::B),
            ..filter
        };
        assert!(!other_variant.matches(&stored));
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let page = Page { page: 2, limit: 50 };
        assert_eq!(page.offset(), 50);
        assert_eq!(Pagination::new(page, 101).pages, 3);
        assert_eq!(Pagination::new(page, 0).pages, 0);
        assert_eq!(Pagination::new(page, 50).pages, 1);
    }
}
