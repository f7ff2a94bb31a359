use super::ApiError;
use crate::domain::filter::MAX_PAGE_LIMIT;
use crate::domain::{DateRange, EventFilter, EventKind, Page, Variant};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

/// Query string of `GET /analytics`. Everything arrives as text so bad values
/// map to a 400 with a useful message instead of a bare extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub kind: Option<String>,
    pub screen_name: Option<String>,
    pub variant: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> Result<(EventFilter, Page), ApiError> {
        let kind = present(self.event_type)
            .or_else(|| present(self.kind))
            .map(|raw| {
                raw.parse::<EventKind>()
                    .map_err(|e| invalid_param("type", &raw, &e.to_string()))
            })
            .transpose()?;
        let variant = present(self.variant)
            .map(|raw| {
                raw.parse::<Variant>()
                    .map_err(|reason| invalid_param("variant", &raw, &reason))
            })
            .transpose()?;

        let defaults = Page::default();
        let page = Page {
            page: positive("page", self.page)?.unwrap_or(defaults.page),
            limit: positive("limit", self.limit)?
                .unwrap_or(defaults.limit)
                .min(MAX_PAGE_LIMIT),
        };

        let filter = EventFilter {
            kind,
            screen_name: present(self.screen_name),
            variant,
            range: RangeParams {
                start_date: self.start_date,
                end_date: self.end_date,
            }
            .into_range()?,
        };
        Ok((filter, page))
    }
}

impl RangeParams {
    pub fn into_range(self) -> Result<DateRange, ApiError> {
        Ok(DateRange {
            start: present(self.start_date)
                .map(|raw| parse_date("startDate", &raw))
                .transpose()?,
            end: present(self.end_date)
                .map(|raw| parse_date("endDate", &raw))
                .transpose()?,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid_param(name: &str, raw: &str, reason: &str) -> ApiError {
    ApiError::bad_request(
        "Invalid query parameter",
        json!({ "parameter": name, "value": raw, "message": reason }),
    )
}

fn positive(name: &str, value: Option<String>) -> Result<Option<u32>, ApiError> {
    let Some(raw) = present(value) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        Ok(_) => Err(invalid_param(name, &raw, "must be at least 1")),
        Err(e) => Err(invalid_param(name, &raw, &e.to_string())),
    }
}

/// RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_date(name: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| invalid_param(name, raw, "expected RFC 3339 or YYYY-MM-DD"))
}
