//! printf-style message formatting.
//!
//! Templates follow the C conversion grammar
//! `%[flags][width][.precision][length]conversion`. Formatting never fails:
//! a directive that cannot be honoured (unknown conversion, missing argument,
//! trailing `%`) is copied to the output verbatim, and mismatched argument
//! kinds are coerced as sensibly as possible.
//!
//! The result is bounded by [`MAX_MESSAGE_LEN`] bytes and cut at a character
//! boundary. A template without any `%` is returned unchanged and is never
//! truncated.

use std::borrow::Cow;
use std::fmt::{self, Write};

/// Upper bound, in bytes, of a formatted message.
pub const MAX_MESSAGE_LEN: usize = 8192;

/// One argument of a printf-style template.
#[derive(Clone, Copy)]
pub enum FormatArg<'a> {
    /// Signed integer (`%d`, `%i`)
    Int(i64),
    /// Unsigned integer (`%u`, `%x`, `%o`)
    UInt(u64),
    /// Floating point (`%f`, `%e`, `%g`)
    Float(f64),
    /// Single character (`%c`)
    Char(char),
    /// Narrow string (`%s`)
    Str(&'a str),
    /// Wide (UTF-16) string (`%s` in wide templates, `%S`)
    Wide(&'a [u16]),
    /// Pointer value (`%p`)
    Ptr(usize),
    /// Any displayable value; only rendered when the message is formatted
    Display(&'a dyn fmt::Display),
}

impl fmt::Debug for FormatArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Int(v) => f.debug_tuple("Int").field(v).finish(),
            FormatArg::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            FormatArg::Float(v) => f.debug_tuple("Float").field(v).finish(),
            FormatArg::Char(v) => f.debug_tuple("Char").field(v).finish(),
            FormatArg::Str(v) => f.debug_tuple("Str").field(v).finish(),
            FormatArg::Wide(v) => f.debug_tuple("Wide").field(&String::from_utf16_lossy(v)).finish(),
            FormatArg::Ptr(v) => write!(f, "Ptr({:#x})", v),
            FormatArg::Display(_) => f.write_str("Display(..)"),
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                FormatArg::Int(v as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                FormatArg::UInt(v as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FormatArg<'_> {
    fn from(v: f32) -> Self {
        FormatArg::Float(f64::from(v))
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(v: f64) -> Self {
        FormatArg::Float(v)
    }
}

impl From<char> for FormatArg<'_> {
    fn from(v: char) -> Self {
        FormatArg::Char(v)
    }
}

impl From<bool> for FormatArg<'_> {
    fn from(v: bool) -> Self {
        FormatArg::Int(i64::from(v))
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(v: &'a str) -> Self {
        FormatArg::Str(v)
    }
}

impl<'a> From<&'a String> for FormatArg<'a> {
    fn from(v: &'a String) -> Self {
        FormatArg::Str(v.as_str())
    }
}

impl<'a> From<&'a [u16]> for FormatArg<'a> {
    fn from(v: &'a [u16]) -> Self {
        FormatArg::Wide(v)
    }
}

impl<'a> FormatArg<'a> {
    fn as_i64(&self) -> i64 {
        match *self {
            FormatArg::Int(v) => v,
            FormatArg::UInt(v) => v as i64,
            FormatArg::Float(v) => v as i64,
            FormatArg::Char(c) => c as i64,
            FormatArg::Ptr(p) => p as i64,
            FormatArg::Str(s) => s.trim().parse().unwrap_or(0),
            FormatArg::Wide(w) => String::from_utf16_lossy(w).trim().parse().unwrap_or(0),
            FormatArg::Display(d) => d.to_string().trim().parse().unwrap_or(0),
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            FormatArg::Int(v) => v as f64,
            FormatArg::UInt(v) => v as f64,
            FormatArg::Float(v) => v,
            FormatArg::Char(c) => f64::from(c as u32),
            FormatArg::Ptr(p) => p as f64,
            FormatArg::Str(s) => s.trim().parse().unwrap_or(0.0),
            FormatArg::Wide(w) => String::from_utf16_lossy(w).trim().parse().unwrap_or(0.0),
            FormatArg::Display(d) => d.to_string().trim().parse().unwrap_or(0.0),
        }
    }

    fn as_char(&self) -> char {
        match *self {
            FormatArg::Char(c) => c,
            FormatArg::Str(s) => s.chars().next().unwrap_or('\0'),
            FormatArg::Wide(w) => char::decode_utf16(w.iter().copied())
                .next()
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .unwrap_or('\0'),
            other => u32::try_from(other.as_i64())
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        }
    }

    fn as_text(&self) -> Cow<'a, str> {
        match *self {
            FormatArg::Str(s) => Cow::Borrowed(s),
            FormatArg::Wide(w) => Cow::Owned(String::from_utf16_lossy(w)),
            FormatArg::Int(v) => Cow::Owned(v.to_string()),
            FormatArg::UInt(v) => Cow::Owned(v.to_string()),
            FormatArg::Float(v) => Cow::Owned(v.to_string()),
            FormatArg::Char(c) => Cow::Owned(c.to_string()),
            FormatArg::Ptr(p) => Cow::Owned(format!("{:#x}", p)),
            FormatArg::Display(d) => Cow::Owned(d.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Length {
    #[default]
    Default,
    Char,
    Short,
    Wide,
}

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: usize,
    precision: Option<usize>,
    length: Length,
}

/// Format `template` against `args`.
///
/// Returns the template itself when it contains no `%`.
///
/// ```
/// use logshim_core::format::{format_message, FormatArg};
///
/// assert_eq!(format_message("value=%d", &[FormatArg::Int(42)]), "value=42");
/// assert_eq!(format_message("%-5s|%05.1f", &["ab".into(), 3.14159.into()]), "ab   |003.1");
/// assert_eq!(format_message("no directives", &[]), "no directives");
/// ```
pub fn format_message<'t>(template: &'t str, args: &[FormatArg<'_>]) -> Cow<'t, str> {
    if !template.contains('%') {
        return Cow::Borrowed(template);
    }
    Cow::Owned(expand(template, args))
}

/// Format a UTF-16 template; unpaired surrogates decode to U+FFFD.
pub fn format_wide(template: &[u16], args: &[FormatArg<'_>]) -> String {
    let decoded = String::from_utf16_lossy(template);
    if !template.contains(&u16::from(b'%')) {
        return decoded;
    }
    expand(&decoded, args)
}

fn expand(template: &str, args: &[FormatArg<'_>]) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len().min(MAX_MESSAGE_LEN) + 16);
    let mut args = args.iter();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() && out.len() < MAX_MESSAGE_LEN {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        out.push_str(&template[literal_start..i]);
        let directive_start = i;
        i = directive(template, i + 1, &mut args, &mut out)
            .unwrap_or_else(|end| {
                out.push_str(&template[directive_start..end]);
                end
            });
        literal_start = i;
    }
    if literal_start < bytes.len() && out.len() < MAX_MESSAGE_LEN {
        out.push_str(&template[literal_start..]);
    }

    truncate_at_boundary(&mut out, MAX_MESSAGE_LEN);
    out
}

/// Parse and render one directive whose `%` precedes `start`.
///
/// Returns the index after the directive, or `Err(end)` when the directive
/// should be copied verbatim up to `end`.
fn directive<'a, 'b>(
    template: &str,
    start: usize,
    args: &mut impl Iterator<Item = &'b FormatArg<'a>>,
    out: &mut String,
) -> Result<usize, usize>
where
    'a: 'b,
{
    let bytes = template.as_bytes();
    let mut i = start;
    let mut spec = Spec::default();

    if bytes.get(i) == Some(&b'%') {
        out.push('%');
        return Ok(i + 1);
    }

    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => spec.left = true,
            b'+' => spec.plus = true,
            b' ' => spec.space = true,
            b'0' => spec.zero = true,
            b'#' => spec.alt = true,
            _ => break,
        }
        i += 1;
    }

    if bytes.get(i) == Some(&b'*') {
        i += 1;
        let width = args.next().ok_or(i)?.as_i64();
        if width < 0 {
            spec.left = true;
        }
        spec.width = clamp(width.unsigned_abs());
    } else {
        let (width, next) = digits(bytes, i);
        spec.width = width;
        i = next;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        if bytes.get(i) == Some(&b'*') {
            i += 1;
            let precision = args.next().ok_or(i)?.as_i64();
            spec.precision = (precision >= 0).then(|| clamp(precision.unsigned_abs()));
        } else {
            let (precision, next) = digits(bytes, i);
            spec.precision = Some(precision);
            i = next;
        }
    }

    i = length_modifier(bytes, i, &mut spec);

    let conversion = match bytes.get(i) {
        Some(&b) => b,
        None => return Err(i),
    };
    let end = i + 1;

    match conversion {
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'f' | b'F' | b'e' | b'E' | b'g' | b'G'
        | b'c' | b'C' | b's' | b'S' | b'p' | b'n' => {}
        _ => {
            // Keep whole characters when the unknown conversion is multi-byte.
            let mut end = end;
            while !template.is_char_boundary(end) {
                end += 1;
            }
            return Err(end);
        }
    }

    let arg = args.next().ok_or(end)?;
    match conversion {
        b'd' | b'i' => signed(out, &spec, arg.as_i64()),
        b'u' | b'o' | b'x' | b'X' => unsigned(out, &spec, arg, conversion),
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' => float(out, &spec, arg.as_f64(), conversion),
        b'c' | b'C' => {
            let mut buf = [0u8; 4];
            pad(out, &spec, "", arg.as_char().encode_utf8(&mut buf), false);
        }
        b's' | b'S' => {
            let text = arg.as_text();
            let text = match spec.precision {
                Some(max) => truncate_chars(&text, max),
                None => &text,
            };
            pad(out, &spec, "", text, false);
        }
        b'p' => {
            let value = match *arg {
                FormatArg::Ptr(p) => p as u64,
                other => other.as_i64() as u64,
            };
            pad(out, &spec, "", &format!("{:#x}", value), false);
        }
        // `%n` stores a count in C; here it only consumes its argument.
        _ => {}
    }
    Ok(end)
}

fn digits(bytes: &[u8], mut i: usize) -> (usize, usize) {
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(usize::from(b - b'0'));
        i += 1;
    }
    (value.min(MAX_MESSAGE_LEN), i)
}

fn clamp(v: u64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX).min(MAX_MESSAGE_LEN)
}

fn length_modifier(bytes: &[u8], mut i: usize, spec: &mut Spec) -> usize {
    loop {
        match bytes.get(i) {
            Some(b'h') => {
                spec.length = if spec.length == Length::Short {
                    Length::Char
                } else {
                    Length::Short
                };
                i += 1;
            }
            Some(b'l') | Some(b'j') | Some(b'z') | Some(b't') | Some(b'q') | Some(b'L') => {
                spec.length = Length::Wide;
                i += 1;
            }
            Some(b'w') => i += 1,
            Some(b'I') => {
                i += 1;
                if bytes[i..].starts_with(b"64") {
                    spec.length = Length::Wide;
                    i += 2;
                } else if bytes[i..].starts_with(b"32") {
                    i += 2;
                }
            }
            _ => return i,
        }
    }
}

fn signed(out: &mut String, spec: &Spec, value: i64) {
    let value = match spec.length {
        Length::Char => i64::from(value as i8),
        Length::Short => i64::from(value as i16),
        _ => value,
    };
    let sign = if value < 0 {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };
    let digits = integer_digits(value.unsigned_abs().to_string(), spec.precision);
    pad(out, spec, sign, &digits, spec.precision.is_none());
}

fn unsigned(out: &mut String, spec: &Spec, arg: &FormatArg<'_>, conversion: u8) {
    let raw = match *arg {
        FormatArg::UInt(v) => v,
        FormatArg::Ptr(p) => p as u64,
        // A negative `int` printed unsigned wraps at 32 bits, as in C.
        FormatArg::Int(v) if v < 0 && v >= i64::from(i32::MIN) && spec.length != Length::Wide => {
            u64::from(v as i32 as u32)
        }
        other => other.as_i64() as u64,
    };
    let value = match spec.length {
        Length::Char => u64::from(raw as u8),
        Length::Short => u64::from(raw as u16),
        _ => raw,
    };

    let (body, prefix) = match conversion {
        b'o' => {
            let mut body = integer_digits(format!("{:o}", value), spec.precision);
            if spec.alt && !body.starts_with('0') {
                body.insert(0, '0');
            }
            (body, "")
        }
        b'x' => (
            integer_digits(format!("{:x}", value), spec.precision),
            if spec.alt && value != 0 { "0x" } else { "" },
        ),
        b'X' => (
            integer_digits(format!("{:X}", value), spec.precision),
            if spec.alt && value != 0 { "0X" } else { "" },
        ),
        _ => (integer_digits(value.to_string(), spec.precision), ""),
    };
    pad(out, spec, prefix, &body, spec.precision.is_none());
}

/// Apply an integer precision: minimum digit count, and an empty body for
/// zero with precision zero.
fn integer_digits(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(0) if digits == "0" => String::new(),
        Some(p) if p > digits.len() => {
            let mut padded = "0".repeat(p - digits.len());
            padded.push_str(&digits);
            padded
        }
        _ => digits,
    }
}

fn float(out: &mut String, spec: &Spec, value: f64, conversion: u8) {
    let upper = conversion.is_ascii_uppercase();
    let sign = if value.is_sign_negative() && !(value.is_nan()) {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };

    if !value.is_finite() {
        let text = match (value.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        pad(out, spec, sign, text, false);
        return;
    }

    let abs = value.abs();
    let precision = spec.precision.unwrap_or(6);
    let body = match conversion.to_ascii_lowercase() {
        b'f' => fixed(abs, precision, spec.alt),
        b'e' => exponential(abs, precision, spec.alt),
        _ => general(abs, precision, spec.alt),
    };
    let body = if upper { body.to_uppercase() } else { body };
    pad(out, spec, sign, &body, true);
}

fn fixed(value: f64, precision: usize, alt: bool) -> String {
    let mut body = format!("{:.*}", precision, value);
    if alt && precision == 0 {
        body.push('.');
    }
    body
}

fn exponential(value: f64, precision: usize, alt: bool) -> String {
    let rust = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = rust.split_once('e').unwrap_or((rust.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let mut body = String::with_capacity(mantissa.len() + 5);
    body.push_str(mantissa);
    if alt && precision == 0 {
        body.push('.');
    }
    let _ = write!(
        body,
        "e{}{:02}",
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    );
    body
}

fn general(value: f64, precision: usize, alt: bool) -> String {
    let p = precision.max(1);
    let probe = format!("{:.*e}", p - 1, value);
    let exponent: i64 = probe
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    let p = p as i64;
    let mut body = if exponent < -4 || exponent >= p {
        exponential(value, (p - 1) as usize, alt)
    } else {
        fixed(value, (p - 1 - exponent) as usize, alt)
    };

    if !alt {
        let (mantissa, suffix) = match body.find('e') {
            Some(at) => body.split_at(at),
            None => (body.as_str(), ""),
        };
        if mantissa.contains('.') {
            let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
            body = format!("{}{}", trimmed, suffix);
        }
    }
    body
}

/// Write `prefix` + `body` padded to the spec's width.
///
/// With `zero_ok`, the `0` flag pads between the prefix and the body.
fn pad(out: &mut String, spec: &Spec, prefix: &str, body: &str, zero_ok: bool) {
    let len = prefix.chars().count() + body.chars().count();
    let fill = spec.width.saturating_sub(len);

    if spec.left {
        out.push_str(prefix);
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero && zero_ok {
        out.push_str(prefix);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(body);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(prefix);
        out.push_str(body);
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((at, _)) => &text[..at],
        None => text,
    }
}

/// Cut `s` to at most `max` bytes without splitting a character.
pub fn truncate_at_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn fmt(template: &str, args: &[FormatArg<'_>]) -> String {
        format_message(template, args).into_owned()
    }

    #[test]
    fn test_plain_template_is_borrowed() {
        let template = "nothing to expand";
        assert!(matches!(format_message(template, &[]), Cow::Borrowed(_)));
    }

    #[test]
    fn test_integers() {
        assert_eq!(fmt("value=%d", &[42.into()]), "value=42");
        assert_eq!(fmt("%i|%5d|%-5d|%05d", &[(-7).into(), 42.into(), 42.into(), (-42).into()]), "-7|   42|42   |-0042");
        assert_eq!(fmt("%+d % d", &[5.into(), 5.into()]), "+5  5");
        assert_eq!(fmt("%.3d|%.0d", &[7.into(), 0.into()]), "007|");
        assert_eq!(fmt("%ld %lld %I64d", &[1.into(), 2.into(), 3.into()]), "1 2 3");
        assert_eq!(fmt("%hd %hhd", &[70000.into(), 300.into()]), "4464 44");
    }

    #[test]
    fn test_unsigned_and_radix() {
        assert_eq!(fmt("%u", &[(-1).into()]), "4294967295");
        assert_eq!(fmt("%llu", &[FormatArg::Int(-1)]), "18446744073709551615");
        assert_eq!(fmt("%x %X %#x %#o %o", &[255u32.into(), 255u32.into(), 255u32.into(), 8u32.into(), 0u32.into()]), "ff FF 0xff 010 0");
        assert_eq!(fmt("%#x", &[0u32.into()]), "0");
        assert_eq!(fmt("%08x", &[0xbeefu32.into()]), "0000beef");
    }

    #[test]
    fn test_floats() {
        assert_eq!(fmt("%f", &[1.5.into()]), "1.500000");
        assert_eq!(fmt("%.2f", &[3.14159.into()]), "3.14");
        assert_eq!(fmt("%8.3f|%-8.1f|", &[2.5.into(), 2.5.into()]), "   2.500|2.5     |");
        assert_eq!(fmt("%e", &[12345.678.into()]), "1.234568e+04");
        assert_eq!(fmt("%E", &[0.00012.into()]), "1.200000E-04");
        assert_eq!(fmt("%g %g %g", &[100000.0.into(), 1000000.0.into(), 0.0001.into()]), "100000 1e+06 0.0001");
        assert_eq!(fmt("%g", &[0.5.into()]), "0.5");
        assert_eq!(fmt("%+.1f", &[2.0.into()]), "+2.0");
        assert_eq!(fmt("%f %F", &[f64::INFINITY.into(), f64::NAN.into()]), "inf NAN");
        assert_eq!(fmt("%.0f", &[2.0.into()]), "2");
    }

    #[test]
    fn test_strings_and_chars() {
        assert_eq!(fmt("[%s]", &["abc".into()]), "[abc]");
        assert_eq!(fmt("[%5s][%-5s][%.2s]", &["ab".into(), "ab".into(), "abcdef".into()]), "[   ab][ab   ][ab]");
        assert_eq!(fmt("%c%c", &['h'.into(), FormatArg::Int(105)]), "hi");
        let wide: Vec<u16> = "wide".encode_utf16().collect();
        assert_eq!(fmt("%S", &[FormatArg::Wide(&wide)]), "wide");
        assert_eq!(fmt("%s", &[42.into()]), "42");
        assert_eq!(fmt("%d", &["17".into()]), "17");
        assert_eq!(fmt("%d", &["x".into()]), "0");
    }

    #[test]
    fn test_star_width_and_precision() {
        assert_eq!(fmt("%*d|%-*d|%.*f", &[4.into(), 1.into(), 3.into(), 2.into(), 1.into(), 1.26.into()]), "   1|2  |1.3");
        assert_eq!(fmt("%*d", &[(-4).into(), 1.into()]), "1   ");
    }

    #[test]
    fn test_pointer() {
        assert_eq!(fmt("%p", &[FormatArg::Ptr(0x1000)]), "0x1000");
    }

    #[test]
    fn test_percent_escape_and_malformed_directives() {
        assert_eq!(fmt("100%%", &[]), "100%");
        assert_eq!(fmt("ends with %", &[]), "ends with %");
        assert_eq!(fmt("%y and %d", &[1.into()]), "%y and 1");
        assert_eq!(fmt("missing %d and %s", &[1.into()]), "missing 1 and %s");
        assert_eq!(fmt("%5.2", &[]), "%5.2");
        assert_eq!(fmt("%é", &[]), "%é");
        assert_eq!(fmt("%n done", &[0.into()]), " done");
    }

    #[test]
    fn test_display_arg_is_rendered_lazily() {
        struct Counted<'a>(&'a Cell<u32>);
        impl fmt::Display for Counted<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.set(self.0.get() + 1);
                f.write_str("shown")
            }
        }

        let calls = Cell::new(0);
        let counted = Counted(&calls);
        let args = [FormatArg::Display(&counted)];
        assert_eq!(calls.get(), 0);
        assert_eq!(fmt("<%s>", &args), "<shown>");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_output_is_bounded() {
        let long = "x".repeat(MAX_MESSAGE_LEN * 2);
        let out = fmt("%s tail", &[long.as_str().into()]);
        assert_eq!(out.len(), MAX_MESSAGE_LEN);

        let wide = fmt("%99999999d", &[1.into()]);
        assert!(wide.len() <= MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let long = "é".repeat(MAX_MESSAGE_LEN);
        let out = fmt("%s", &[long.as_str().into()]);
        assert!(out.len() <= MAX_MESSAGE_LEN);
        assert!(out.len() >= MAX_MESSAGE_LEN - 1);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_wide_template() {
        let template: Vec<u16> = "value=%d".encode_utf16().collect();
        assert_eq!(format_wide(&template, &[42.into()]), "value=42");
        let plain: Vec<u16> = "ünïcode".encode_utf16().collect();
        assert_eq!(format_wide(&plain, &[]), "ünïcode");
    }

    proptest! {
        #[test]
        fn prop_templates_without_percent_pass_through(template in "[^%]{0,200}") {
            prop_assert_eq!(format_message(&template, &[FormatArg::Int(1)]), template.as_str());
        }

        #[test]
        fn prop_decimal_matches_std(v in any::<i64>()) {
            prop_assert_eq!(fmt("%d", &[FormatArg::Int(v)]), v.to_string());
        }

        #[test]
        fn prop_formatting_never_exceeds_bound(template in ".{0,64}", n in any::<i32>()) {
            let out = fmt(&template, &[n.into(), "s".into(), 1.5.into()]);
            prop_assert!(out.len() <= MAX_MESSAGE_LEN);
        }
    }
}
