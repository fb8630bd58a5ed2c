//! Per-tag description rendering: unit conversion and enum naming.
//!
//! Every function here returns `None` when it cannot render the value, and
//! the caller falls back to the raw value string.

use super::tags::{exif, gps, jpeg};
use super::{Directory, DirectoryKind, Rational, TagValue};

/// Render the description of `id` within `directory`, if a specific
/// rendering exists for it.
pub(crate) fn describe(directory: &Directory, id: u16) -> Option<String> {
    let value = directory.get(id)?;
    match directory.kind() {
        DirectoryKind::Exif => describe_exif(directory, id, value),
        DirectoryKind::Gps => describe_gps(id, value),
        DirectoryKind::Jpeg => describe_jpeg(id, value),
        DirectoryKind::JpegComment => None,
    }
}

/// Metering mode names. Unmapped values have no name.
pub fn metering_mode_name(mode: i64) -> Option<&'static str> {
    let name = match mode {
        0 => "Unknown",
        1 => "Average",
        2 => "Center Weighted Average",
        3 => "Spot",
        4 => "Multi-spot",
        5 => "Multi-segment",
        6 => "Partial",
        255 => "Other",
        _ => return None,
    };
    Some(name)
}

/// Exposure program names. Unmapped values, including 0, have no name.
pub fn exposure_program_name(program: i64) -> Option<&'static str> {
    let name = match program {
        1 => "Manual Control",
        2 => "Program Normal",
        3 => "Aperture Priority",
        4 => "Shutter Priority",
        5 => "Program Creative",
        6 => "Program Action",
        7 => "Portrait Mode",
        8 => "Landscape Mode",
        _ => return None,
    };
    Some(name)
}

fn describe_exif(directory: &Directory, id: u16, value: &TagValue) -> Option<String> {
    match id {
        exif::ORIENTATION => {
            let name = match value.as_int()? {
                1 => "Top, left side (Horizontal / normal)",
                2 => "Top, right side (Mirror horizontal)",
                3 => "Bottom, right side (Rotate 180)",
                4 => "Bottom, left side (Mirror vertical)",
                5 => "Left side, top (Mirror horizontal and rotate 270 CW)",
                6 => "Right side, top (Rotate 90 CW)",
                7 => "Right side, bottom (Mirror horizontal and rotate 90 CW)",
                8 => "Left side, bottom (Rotate 270 CW)",
                _ => return None,
            };
            Some(name.to_string())
        }
        exif::RESOLUTION_UNIT => resolution_unit(value.as_int()?).map(str::to_string),
        exif::X_RESOLUTION | exif::Y_RESOLUTION => {
            let resolution = value.as_rational()?.to_simple_string(true);
            let unit = directory
                .get_int(exif::RESOLUTION_UNIT)
                .ok()
                .and_then(resolution_unit);
            Some(match unit {
                Some(unit) => format!("{resolution} dots per {}", unit.to_lowercase()),
                None => resolution,
            })
        }
        exif::YCBCR_POSITIONING => match value.as_int()? {
            1 => Some("Center of pixel array".into()),
            2 => Some("Datum point".into()),
            _ => None,
        },
        exif::EXPOSURE_TIME => {
            Some(format!("{} sec", value.as_rational()?.to_simple_string(true)))
        }
        exif::FNUMBER | exif::APERTURE | exif::MAX_APERTURE => {
            let r = value.as_rational()?;
            let f_number = if id == exif::FNUMBER {
                r.to_f64()
            } else {
                // APEX aperture value
                2f64.powf(r.to_f64() / 2.0)
            };
            f_number.is_finite().then(|| format!("F{f_number:.1}"))
        }
        exif::EXPOSURE_PROGRAM => {
            let name = match value.as_int()? {
                1 => "Manual control",
                2 => "Program normal",
                3 => "Aperture priority",
                4 => "Shutter priority",
                5 => "Program creative (slow program)",
                6 => "Program action (high-speed program)",
                7 => "Portrait mode",
                8 => "Landscape mode",
                _ => return None,
            };
            Some(name.to_string())
        }
        exif::EXIF_VERSION | exif::FLASHPIX_VERSION | exif::INTEROP_VERSION => {
            version_string(value.as_bytes()?)
        }
        exif::COMPONENTS_CONFIGURATION => {
            let names: String = value
                .as_bytes()?
                .iter()
                .filter_map(|c| match *c {
                    1 => Some("Y"),
                    2 => Some("Cb"),
                    3 => Some("Cr"),
                    4 => Some("R"),
                    5 => Some("G"),
                    6 => Some("B"),
                    _ => None,
                })
                .collect();
            (!names.is_empty()).then_some(names)
        }
        exif::EXPOSURE_BIAS => {
            let bias = value.as_rational()?.to_f64();
            bias.is_finite().then(|| format!("{bias:.2} EV"))
        }
        exif::METERING_MODE => metering_mode_name(value.as_int()?).map(str::to_string),
        exif::FLASH => {
            let flash = value.as_int()?;
            let mut description = if flash & 0x01 != 0 {
                "Flash fired".to_string()
            } else {
                "Flash did not fire".to_string()
            };
            if flash & 0x40 != 0 {
                description.push_str(", red-eye reduction");
            }
            Some(description)
        }
        exif::FOCAL_LENGTH => {
            let mm = value.as_rational()?.to_f64();
            mm.is_finite().then(|| format!("{mm:.1} mm"))
        }
        exif::FOCAL_LENGTH_35MM => Some(format!("{} mm", value.as_int()?)),
        exif::SUBJECT_DISTANCE => {
            let metres = value.as_rational()?.to_f64();
            metres.is_finite().then(|| format!("{metres} metres"))
        }
        exif::IMAGE_WIDTH | exif::IMAGE_HEIGHT | exif::EXIF_IMAGE_WIDTH | exif::EXIF_IMAGE_HEIGHT => {
            Some(format!("{} pixels", value.as_int()?))
        }
        exif::COLOR_SPACE => match value.as_int()? {
            1 => Some("sRGB".into()),
            0xFFFF => Some("Undefined".into()),
            _ => None,
        },
        exif::EXPOSURE_MODE => match value.as_int()? {
            0 => Some("Auto exposure".into()),
            1 => Some("Manual exposure".into()),
            2 => Some("Auto bracket".into()),
            _ => None,
        },
        exif::WHITE_BALANCE => match value.as_int()? {
            0 => Some("Auto white balance".into()),
            1 => Some("Manual white balance".into()),
            _ => None,
        },
        exif::SCENE_CAPTURE_TYPE => match value.as_int()? {
            0 => Some("Standard".into()),
            1 => Some("Landscape".into()),
            2 => Some("Portrait".into()),
            3 => Some("Night scene".into()),
            _ => None,
        },
        exif::USER_COMMENT => user_comment(value.as_bytes()?),
        _ => None,
    }
}

fn resolution_unit(unit: i64) -> Option<&'static str> {
    match unit {
        1 => Some("(No unit)"),
        2 => Some("Inch"),
        3 => Some("cm"),
        _ => None,
    }
}

/// `[b'0', b'2', b'2', b'0']` → `"2.20"`.
fn version_string(bytes: &[u8]) -> Option<String> {
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let digits = std::str::from_utf8(bytes).ok()?;
    let major = digits[..2].trim_start_matches('0');
    let major = if major.is_empty() { "0" } else { major };
    Some(format!("{major}.{}", &digits[2..]))
}

/// The first eight bytes name the character code; only ASCII and
/// undefined-with-ASCII-content are rendered.
fn user_comment(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 8 {
        return None;
    }
    let (charset, text) = bytes.split_at(8);
    if charset.starts_with(b"ASCII") || charset.iter().all(|b| *b == 0) {
        let text = String::from_utf8_lossy(text);
        return Some(text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string());
    }
    None
}

fn describe_gps(id: u16, value: &TagValue) -> Option<String> {
    match id {
        gps::VERSION_ID => {
            let bytes = value.as_bytes()?;
            Some(
                bytes
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join("."),
            )
        }
        gps::LATITUDE | gps::LONGITUDE => match value {
            TagValue::Rationals(parts) => degrees_minutes_seconds(parts),
            _ => None,
        },
        gps::ALTITUDE_REF => match value.as_int()? {
            0 => Some("Sea level".into()),
            1 => Some("Below sea level".into()),
            _ => None,
        },
        gps::ALTITUDE => {
            let metres = value.as_rational()?.to_simple_string(true);
            Some(format!("{metres} metres"))
        }
        gps::TIMESTAMP => match value {
            TagValue::Rationals(parts) if parts.len() == 3 => {
                let [h, m, s] = [parts[0], parts[1], parts[2]].map(|p| p.to_f64());
                Some(format!("{h:02}:{m:02}:{s:02} UTC"))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Three rationals (degrees, minutes, seconds) → `37° 46' 29.64"`.
fn degrees_minutes_seconds(parts: &[Rational]) -> Option<String> {
    if parts.len() != 3 {
        return None;
    }
    let degrees = parts[0].to_f64();
    let minutes = parts[1].to_f64();
    let seconds = parts[2].to_f64();
    if !(degrees.is_finite() && minutes.is_finite() && seconds.is_finite()) {
        return None;
    }
    Some(format!("{degrees}° {minutes}' {seconds:.2}\""))
}

/// Decimal degrees from three GPS rationals, or `None` if any is invalid.
pub fn decimal_degrees(parts: &[Rational]) -> Option<f64> {
    if parts.len() != 3 {
        return None;
    }
    let decimal = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;
    decimal.is_finite().then_some(decimal)
}

fn describe_jpeg(id: u16, value: &TagValue) -> Option<String> {
    match id {
        jpeg::DATA_PRECISION => Some(format!("{} bits", value.as_int()?)),
        jpeg::IMAGE_HEIGHT | jpeg::IMAGE_WIDTH => Some(format!("{} pixels", value.as_int()?)),
        jpeg::COMPONENT_DATA_1..=jpeg::COMPONENT_DATA_4 => {
            let component = value.as_bytes()?;
            if component.len() != 3 {
                return None;
            }
            let name = match component[0] {
                1 => "Y",
                2 => "Cb",
                3 => "Cr",
                4 => "I",
                5 => "Q",
                _ => "Unknown",
            };
            let sampling = component[1];
            Some(format!(
                "{name} component: Quantization table {}, Sampling factors {} horiz/{} vert",
                component[2],
                sampling >> 4,
                sampling & 0x0F
            ))
        }
        _ => None,
    }
}
