use crate::error::ValidationError;
use crate::event::TelemetryEvent;
use crate::kind::{EventKind, Variant};
use serde_json::{Map, Value};

const KIND_KEYS: [&str; 2] = ["kind", "type"];

/// Resolves only the `kind` of a raw event.
///
/// Kind gates every other rule, so batch ingestion checks it for all entries
/// before attempting anything else.
pub fn kind_of(raw: &Value) -> Result<EventKind, ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::NotAnObject)?;
    kind_from_object(object)
}

fn kind_from_object(object: &Map<String, Value>) -> Result<EventKind, ValidationError> {
    let value = KIND_KEYS
        .iter()
        .find_map(|key| object.get(*key).filter(|v| !v.is_null()))
        .ok_or(ValidationError::MissingRequiredField { field: "kind" })?;

    match value {
        Value::String(s) => s
            .parse::<EventKind>()
            .map_err(|_| ValidationError::InvalidKind(s.clone())),
        other => Err(ValidationError::InvalidKind(other.to_string())),
    }
}

/// Converts a raw JSON object into a typed event.
///
/// Unknown top-level keys are folded into `metadata`; an explicit `metadata`
/// object wins on key collisions. A missing `timestamp` defaults to now.
/// `message` is left as supplied; callers derive it where needed.
pub fn validate(raw: &Value) -> Result<TelemetryEvent, ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::NotAnObject)?;
    let kind = kind_from_object(object)?;

    let mut event = TelemetryEvent::new(kind);
    let mut extras = Map::new();

    for (key, value) in object {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "kind" | "type" => {}
            "timestamp" => event.timestamp = timestamp_field(value)?,
            "screenName" => event.screen_name = Some(string_field("screenName", value)?),
            "buttonName" => event.button_name = Some(string_field("buttonName", value)?),
            "message" => event.message = Some(string_field("message", value)?),
            "variant" => {
                let raw_variant = string_field("variant", value)?;
                let variant = raw_variant
                    .parse::<Variant>()
                    .map_err(|reason| ValidationError::InvalidField {
                        field: "variant",
                        reason,
                    })?;
                event.variant = Some(variant);
            }
            "renderTimeMs" | "renderTime" => event.render_time_ms = Some(render_time_field(value)?),
            "metadata" => match value {
                Value::Object(map) => event.metadata.extend(map.clone()),
                other => {
                    return Err(ValidationError::InvalidField {
                        field: "metadata",
                        reason: format!("expected an object, got {}", json_type(other)),
                    });
                }
            },
            _ => {
                extras.insert(key.clone(), value.clone());
            }
        }
    }

    for (key, value) in extras {
        event.metadata.entry(key).or_insert(value);
    }

    require_kind_fields(&event)?;
    Ok(event)
}

fn require_kind_fields(event: &TelemetryEvent) -> Result<(), ValidationError> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

    match event.kind {
        EventKind::ScreenView => {
            if !present(&event.screen_name) {
                return Err(ValidationError::MissingRequiredField {
                    field: "screenName",
                });
            }
        }
        EventKind::ButtonClick => {
            if !present(&event.button_name) {
                return Err(ValidationError::MissingRequiredField {
                    field: "buttonName",
                });
            }
        }
        EventKind::RenderTime => {
            if !present(&event.screen_name) {
                return Err(ValidationError::MissingRequiredField {
                    field: "screenName",
                });
            }
            if event.render_time_ms.is_none() {
                return Err(ValidationError::MissingRequiredField {
                    field: "renderTimeMs",
                });
            }
        }
    }
    Ok(())
}

fn string_field(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidField {
            field,
            reason: format!("expected a string, got {}", json_type(value)),
        })
}

fn timestamp_field(value: &Value) -> Result<i64, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidField {
        field: "timestamp",
        reason,
    };

    let millis = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    f as i64
                }
                _ => return Err(invalid(format!("expected integer milliseconds, got {n}"))),
            },
        },
        other => {
            return Err(invalid(format!(
                "expected integer milliseconds, got {}",
                json_type(other)
            )));
        }
    };

    if millis < 0 {
        return Err(invalid("must not be negative".to_string()));
    }
    Ok(millis)
}

fn render_time_field(value: &Value) -> Result<f64, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidField {
        field: "renderTimeMs",
        reason,
    };

    let ms = value
        .as_f64()
        .ok_or_else(|| invalid(format!("expected a number, got {}", json_type(value))))?;
    if !ms.is_finite() || ms < 0.0 {
        return Err(invalid(format!("must be a non-negative number, got {ms}")));
    }
    Ok(ms)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
