//! Lenient readers for loosely shaped JSON values.

use serde_json::{Map, Value};

/// First present, non-null value among alias keys
pub fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// Identifier from a non-empty string or an integral number
pub fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                let f = n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)?;
                // Past the i64 range the cast saturates, so keep the written form
                if f.abs() >= i64::MAX as f64 {
                    Some(n.to_string())
                } else {
                    Some((f as i64).to_string())
                }
            }
        }
        _ => None,
    }
}

/// Non-empty trimmed string
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Signed integer from a number or numeric string; fractions are floored
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.floor() as i64),
        _ => None,
    }
}

/// Non-negative integer that fits a `u32`
pub fn as_u32(value: &Value) -> Option<u32> {
    as_i64(value).and_then(|n| u32::try_from(n).ok())
}

pub fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// `{x, y}` object as signed coordinates
pub fn as_point(value: &Value) -> Option<(i64, i64)> {
    let object = value.as_object()?;
    let x = object.get("x").and_then(as_i64)?;
    let y = object.get("y").and_then(as_i64)?;
    Some((x, y))
}

/// Coordinates inside a `width x height` grid, or `None` if they fall outside
pub fn in_grid((x, y): (i64, i64), width: u32, height: u32) -> Option<(u32, u32)> {
    let x = u32::try_from(x).ok().filter(|x| *x < width)?;
    let y = u32::try_from(y).ok().filter(|y| *y < height)?;
    Some((x, y))
}

/// Clamp coordinates into a non-empty `width x height` grid
pub fn clamp_to_grid((x, y): (i64, i64), width: u32, height: u32) -> (u32, u32) {
    (
        x.clamp(0, width.saturating_sub(1) as i64) as u32,
        y.clamp(0, height.saturating_sub(1) as i64) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_id_accepts_numbers() {
        assert_eq!(as_id(&json!(3)), Some("3".to_string()));
        assert_eq!(as_id(&json!(3.0)), Some("3".to_string()));
        assert_eq!(as_id(&json!(" grass ")), Some("grass".to_string()));
        assert_eq!(as_id(&json!("")), None);
        assert_eq!(as_id(&json!(null)), None);
        assert_eq!(as_id(&json!([1])), None);
        assert_eq!(as_id(&json!(1.5)), None);
    }

    #[test]
    fn test_huge_float_ids_stay_distinct() {
        let a = as_id(&json!(1e20)).unwrap();
        let b = as_id(&json!(3e20)).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, i64::MAX.to_string());
        assert_eq!(as_id(&json!(-5e19)), Some(json!(-5e19).to_string()));
    }

    #[test]
    fn test_numeric_readers() {
        assert_eq!(as_u32(&json!("12")), Some(12));
        assert_eq!(as_u32(&json!(-1)), None);
        assert_eq!(as_i64(&json!(2.7)), Some(2));
        assert_eq!(as_f64(&json!("0.5")), Some(0.5));
        assert_eq!(as_bool(&json!("no")), Some(false));
    }

    #[test]
    fn test_grid_helpers() {
        assert_eq!(in_grid((1, 2), 3, 3), Some((1, 2)));
        assert_eq!(in_grid((-1, 0), 3, 3), None);
        assert_eq!(in_grid((3, 0), 3, 3), None);
        assert_eq!(clamp_to_grid((-4, 9), 3, 5), (0, 4));
    }

    #[test]
    fn test_field_skips_null_aliases() {
        let object = json!({ "zoneId": null, "zone": "town" });
        let object = object.as_object().unwrap();
        assert_eq!(field(object, &["zoneId", "zone"]), Some(&json!("town")));
        assert_eq!(field(object, &["missing"]), None);
    }
}
