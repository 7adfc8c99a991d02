//! MQTT topic naming and payload formatting.

/// Builds a telemetry topic: `base/segment/device/field`.
///
/// Names are not escaped; a `/` inside a name adds a topic level.
#[must_use]
pub fn topic(base: &str, segment: &str, device: &str, field: &str) -> String {
    format!("{base}/{segment}/{device}/{field}")
}

/// Builds the command subscription pattern for a protocol segment.
#[must_use]
pub fn command_topic(base: &str, segment: &str) -> String {
    format!("{base}/{segment}/+/set")
}

/// Formats a measurement the way existing subscribers expect it.
///
/// Integral values lose their fraction (`21.0` becomes `"21"`), values keep
/// the shortest representation that round-trips, NaN becomes `"NaN"` and
/// magnitudes from 1e21 up or below 1e-6 use `1e+21` / `1e-7` notation.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{value}")
    } else {
        let formatted = format!("{value:e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    }
}
