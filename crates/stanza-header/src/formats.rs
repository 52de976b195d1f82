//! Tag output formats and the format registry.
//!
//! Each format renders one [`TagData`] into a freshly allocated string.
//! Formats never fail: a value whose type a format cannot handle renders a
//! parenthesized placeholder instead, and callers see nothing but the
//! string. Registry lookups that find no format are a normal outcome;
//! the query engine falls back to the string format in that case.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use stanza_pgp::{armor_wrap, ArmorKind};
use stanza_utils::perms::perms_string;
use stanza_utils::time::strftime_local;
use tracing::debug;

use crate::flags;
use crate::pgpsig::pgpsig_format;
use crate::tagdata::{TagData, TagValue};
use crate::template::FieldTemplate;

/// Identifies one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    String,
    Armor,
    Base64,
    Pgpsig,
    Depflags,
    Fflags,
    Perms,
    Triggertype,
    Xml,
    Octal,
    Hex,
    Date,
    Day,
    Shescape,
    Arraysize,
}

/// The registry: format codes with their query-language names, in declared
/// order. Aliases share a code ("perms"/"permissions").
const HEADER_FORMATS: &[(FormatCode, &str)] = &[
    (FormatCode::String, "string"),
    (FormatCode::Armor, "armor"),
    (FormatCode::Base64, "base64"),
    (FormatCode::Pgpsig, "pgpsig"),
    (FormatCode::Depflags, "depflags"),
    (FormatCode::Fflags, "fflags"),
    (FormatCode::Perms, "perms"),
    (FormatCode::Perms, "permissions"),
    (FormatCode::Triggertype, "triggertype"),
    (FormatCode::Xml, "xml"),
    (FormatCode::Octal, "octal"),
    (FormatCode::Hex, "hex"),
    (FormatCode::Date, "date"),
    (FormatCode::Day, "day"),
    (FormatCode::Shescape, "shescape"),
    (FormatCode::Arraysize, "arraysize"),
];

/// A resolved output format, ready to render tag data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFormatter {
    code: FormatCode,
}

/// Looks up a format by its query-language name. First match wins.
pub fn header_formatter_by_name(name: &str) -> Option<HeaderFormatter> {
    HEADER_FORMATS
        .iter()
        .find(|(_, entry_name)| *entry_name == name)
        .map(|&(code, _)| HeaderFormatter { code })
}

/// Looks up a format by code. First match wins.
pub fn header_formatter_by_code(code: FormatCode) -> Option<HeaderFormatter> {
    HEADER_FORMATS
        .iter()
        .find(|&&(entry_code, _)| entry_code == code)
        .map(|&(code, _)| HeaderFormatter { code })
}

impl HeaderFormatter {
    pub fn code(&self) -> FormatCode {
        self.code
    }

    /// Renders tag data with this format.
    pub fn render(&self, td: &TagData<'_>, template: &FieldTemplate) -> String {
        match self.code {
            FormatCode::String => string_format(td, template),
            FormatCode::Armor => armor_format(td, template),
            FormatCode::Base64 => base64_format(td, template),
            FormatCode::Pgpsig => pgpsig_format(td, template),
            FormatCode::Depflags => depflags_format(td, template),
            FormatCode::Fflags => fflags_format(td, template),
            FormatCode::Perms => perms_format(td, template),
            FormatCode::Triggertype => triggertype_format(td, template),
            FormatCode::Xml => xml_format(td, template),
            FormatCode::Octal => octal_format(td, template),
            FormatCode::Hex => hex_format(td, template),
            FormatCode::Date => date_format(td, template),
            FormatCode::Day => day_format(td, template),
            FormatCode::Shescape => shescape_format(td, template),
            FormatCode::Arraysize => arraysize_format(td, template),
        }
    }
}

/// Barebones rendering with no extra interpretation. The fallback when a
/// query names no format.
fn string_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    match *td.value() {
        TagValue::Char(v) | TagValue::Int8(v) => template.unsigned(v as u64),
        TagValue::Int16(v) => template.unsigned(v as u64),
        TagValue::Int32(v) => template.unsigned(v as u64),
        TagValue::Int64(v) => template.unsigned(v),
        TagValue::String(s) | TagValue::StringArray(s) | TagValue::I18nString(s) => {
            template.string(s)
        }
        TagValue::Binary(data) => template.string(&hex::encode(data)),
        TagValue::Null => "(unknown type)".to_string(),
    }
}

fn octal_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    match td.as_uint32() {
        Some(v) => template.octal(v),
        None => "(not a number)".to_string(),
    }
}

fn hex_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    match td.as_uint32() {
        Some(v) => template.hex(v),
        None => "(not a number)".to_string(),
    }
}

fn real_date_format(td: &TagData<'_>, template: &FieldTemplate, fmt: &str) -> String {
    match td.as_uint32() {
        // widen through i32 so pre-epoch values stay negative
        Some(v) => template.string(&strftime_local(v as i32 as i64, fmt)),
        None => "(not a number)".to_string(),
    }
}

/// Full local date and time.
fn date_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    real_date_format(td, template, "%c")
}

/// Abbreviated weekday, month, day, year.
fn day_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    real_date_format(td, template, "%a %b %d %Y")
}

/// Renders the value as a single-quoted POSIX shell literal. Int32 values
/// are plain decimal and need no quoting.
fn shescape_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    if let Some(v) = td.as_uint32() {
        return template.signed(i64::from(v as i32));
    }

    let buf = string_format(td, template);
    // worst case: every char is a quote, plus the outer quotes
    let mut result = String::with_capacity(4 * buf.len() + 3);
    result.push('\'');
    for ch in buf.chars() {
        if ch == '\'' {
            result.push_str("'\\''");
        } else {
            result.push(ch);
        }
    }
    result.push('\'');
    result
}

/// Names the trigger phase encoded in a dependency flag set.
fn triggertype_format(td: &TagData<'_>, _template: &FieldTemplate) -> String {
    let Some(item) = td.as_uint32() else {
        return "(not a number)".to_string();
    };
    if item & flags::TRIGGER_PREIN != 0 {
        "prein".to_string()
    } else if item & flags::TRIGGER_IN != 0 {
        "in".to_string()
    } else if item & flags::TRIGGER_UN != 0 {
        "un".to_string()
    } else if item & flags::TRIGGER_POSTUN != 0 {
        "postun".to_string()
    } else {
        String::new()
    }
}

/// File permissions in `ls -l` style.
fn perms_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    match td.as_uint32() {
        Some(mode) => template.string(&perms_string(mode)),
        None => "(not a number)".to_string(),
    }
}

/// One character per set file attribute, in fixed order.
fn fflags_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    let Some(item) = td.as_uint32() else {
        return "(not a number)".to_string();
    };
    let mut buf = String::new();
    for (bit, ch) in [
        (flags::FILE_DOC, 'd'),
        (flags::FILE_CONFIG, 'c'),
        (flags::FILE_SPECFILE, 's'),
        (flags::FILE_MISSINGOK, 'm'),
        (flags::FILE_NOREPLACE, 'n'),
        (flags::FILE_GHOST, 'g'),
        (flags::FILE_LICENSE, 'l'),
        (flags::FILE_README, 'r'),
    ] {
        if item & bit != 0 {
            buf.push(ch);
        }
    }
    template.string(&buf)
}

/// Version comparison operators of a dependency, in fixed order.
fn depflags_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    let Some(item) = td.as_uint32() else {
        return "(not a number)".to_string();
    };
    let mut buf = String::new();
    for (bit, ch) in [
        (flags::DEP_LESS, '<'),
        (flags::DEP_GREATER, '>'),
        (flags::DEP_EQUAL, '='),
    ] {
        if item & bit != 0 {
            buf.push(ch);
        }
    }
    template.string(&buf)
}

/// Element count of the tag's value array.
fn arraysize_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    template.unsigned(td.count() as u64)
}

/// Binary data as base64 text, unbounded line length.
fn base64_format(td: &TagData<'_>, template: &FieldTemplate) -> String {
    match td.as_bytes() {
        Some(data) => template.string(&STANDARD.encode(data)),
        None => "(not a blob)".to_string(),
    }
}

/// Wraps signature or pubkey material in ASCII armor. Binary data is
/// taken as a signature packet; string data is base64-decoded pubkey
/// material first.
fn armor_format(td: &TagData<'_>, _template: &FieldTemplate) -> String {
    match *td.value() {
        TagValue::Binary(data) => armor_wrap(ArmorKind::Signature, data),
        TagValue::String(s) | TagValue::StringArray(s) => match STANDARD.decode(s) {
            Ok(decoded) => armor_wrap(ArmorKind::Pubkey, &decoded),
            Err(err) => {
                debug!("armor input is not base64: {err}");
                "(not base64)".to_string()
            }
        },
        _ => "(invalid type)".to_string(),
    }
}

/// Wraps the value in simple header xml markup: `\t<tag>text</tag>`, with
/// a self-closing element for empty text.
fn xml_format(td: &TagData<'_>, _template: &FieldTemplate) -> String {
    let inner_template = FieldTemplate::new();
    let (xtag, inner) = match *td.value() {
        TagValue::String(_) | TagValue::StringArray(_) | TagValue::I18nString(_) => {
            ("string", string_format(td, &inner_template))
        }
        TagValue::Binary(_) => ("base64", base64_format(td, &inner_template)),
        TagValue::Char(_) | TagValue::Int8(_) | TagValue::Int16(_) | TagValue::Int32(_) => {
            ("integer", string_format(td, &inner_template))
        }
        TagValue::Null | TagValue::Int64(_) => return "(invalid xml type)".to_string(),
    };

    if inner.is_empty() {
        format!("\t<{xtag}/>")
    } else {
        format!("\t<{xtag}>{}</{xtag}>", escape_xml(&inner))
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
    out
}
