//! Light colors in the three encodings exchanged with the dashboard.
//!
//! On the entity side colors live in the `hs_color`, `xy_color` and
//! `rgb_color` attributes (arrays). On the MQTT side they travel inside a
//! `color` object keyed by single letters (`h`/`s`, `x`/`y`, `r`/`g`/`b`).

use serde_json::{Map, Value, json};

use crate::error::DecodeError;

/// Attribute holding an `[hue, saturation]` pair.
pub const ATTR_HS_COLOR: &str = "hs_color";
/// Attribute holding an `[x, y]` CIE pair.
pub const ATTR_XY_COLOR: &str = "xy_color";
/// Attribute holding an `[r, g, b]` triple.
pub const ATTR_RGB_COLOR: &str = "rgb_color";

/// One color in one of the supported encodings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpec {
    Hs { h: f64, s: f64 },
    Xy { x: f64, y: f64 },
    Rgb { r: u8, g: u8, b: u8 },
}

impl ColorSpec {
    /// Every color form present in an attribute map, in HS, XY, RGB order.
    ///
    /// Attributes whose value is not an array of the expected arity and
    /// numeric type are skipped.
    #[must_use]
    pub fn from_attributes<'a>(
        lookup: impl Fn(&str) -> Option<&'a Value>,
    ) -> Vec<Self> {
        let mut colors = Vec::with_capacity(3);
        if let Some([h, s]) = lookup(ATTR_HS_COLOR).and_then(floats::<2>) {
            colors.push(Self::Hs { h, s });
        }
        if let Some([x, y]) = lookup(ATTR_XY_COLOR).and_then(floats::<2>) {
            colors.push(Self::Xy { x, y });
        }
        if let Some([r, g, b]) = lookup(ATTR_RGB_COLOR).and_then(channels) {
            colors.push(Self::Rgb { r, g, b });
        }
        colors
    }

    /// Parse the `color` object of a light command.
    ///
    /// The first present form wins, checked in HS, XY, RGB order, so a
    /// payload carrying several forms always yields the same variant.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidColorComponent`] when the selected form
    /// is missing a companion component or a component is not numeric.
    pub fn from_command(color: &Map<String, Value>) -> Result<Option<Self>, DecodeError> {
        if color.contains_key("h") {
            return Ok(Some(Self::Hs {
                h: float_component(color, "h")?,
                s: float_component(color, "s")?,
            }));
        }
        if color.contains_key("x") {
            return Ok(Some(Self::Xy {
                x: float_component(color, "x")?,
                y: float_component(color, "y")?,
            }));
        }
        if color.contains_key("r") {
            return Ok(Some(Self::Rgb {
                r: channel_component(color, "r")?,
                g: channel_component(color, "g")?,
                b: channel_component(color, "b")?,
            }));
        }
        Ok(None)
    }

    /// Insert the single-letter keys of this color into a state `color` object.
    pub fn write_state_fields(&self, color: &mut Map<String, Value>) {
        match *self {
            Self::Hs { h, s } => {
                color.insert("h".to_string(), json!(h));
                color.insert("s".to_string(), json!(s));
            }
            Self::Xy { x, y } => {
                color.insert("x".to_string(), json!(x));
                color.insert("y".to_string(), json!(y));
            }
            Self::Rgb { r, g, b } => {
                color.insert("r".to_string(), json!(r));
                color.insert("g".to_string(), json!(g));
                color.insert("b".to_string(), json!(b));
            }
        }
    }

    /// The action parameter name and value understood by the dispatcher.
    #[must_use]
    pub fn action_parameter(&self) -> (&'static str, Value) {
        match *self {
            Self::Hs { h, s } => (ATTR_HS_COLOR, json!([h, s])),
            Self::Xy { x, y } => (ATTR_XY_COLOR, json!([x, y])),
            Self::Rgb { r, g, b } => (ATTR_RGB_COLOR, json!([r, g, b])),
        }
    }
}

fn floats<const N: usize>(value: &Value) -> Option<[f64; N]> {
    let items = value.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64()?;
    }
    Some(out)
}

fn channels(value: &Value) -> Option<[u8; 3]> {
    let items = value.as_array()?;
    if items.len() != 3 {
        return None;
    }
    let mut out = [0; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = as_channel(item)?;
    }
    Some(out)
}

fn as_channel(value: &Value) -> Option<u8> {
    value.as_u64().and_then(|v| u8::try_from(v).ok())
}

fn float_component(color: &Map<String, Value>, key: &'static str) -> Result<f64, DecodeError> {
    color
        .get(key)
        .and_then(Value::as_f64)
        .ok_or(DecodeError::InvalidColorComponent(key))
}

fn channel_component(color: &Map<String, Value>, key: &'static str) -> Result<u8, DecodeError> {
    color
        .get(key)
        .and_then(as_channel)
        .ok_or(DecodeError::InvalidColorComponent(key))
}
