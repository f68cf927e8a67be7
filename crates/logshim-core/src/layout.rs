//! Layouts: how a target turns an event into a line of text.
//!
//! A layout is literal text interleaved with `${renderer:param=value}`
//! directives. Parsing never fails; anything that is not a well-formed
//! directive for a known renderer is kept as literal text.

use crate::format::MAX_MESSAGE_LEN;
use chrono::{Datelike, Timelike};
use logshim_types::LogEvent;
use once_cell::sync::Lazy;
use std::fmt::Write;
use std::path::PathBuf;

/// Layout used when a target does not declare one.
pub const DEFAULT_LAYOUT: &str = "${longdate}|${level:uppercase=true}|${logger}|${message}";

static BASE_DIR: Lazy<String> = Lazy::new(|| {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .map(|p| p.display().to_string())
        .unwrap_or_default()
});

/// Letter case applied to a renderer's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Upper case
    Upper,
    /// Lower case
    Lower,
}

/// Parameters shared by every renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Positive pads on the left, negative on the right
    pub padding: i32,
    /// Fill character for padding
    pub pad_character: char,
    /// Truncate output to `|padding|` characters
    pub fixed_length: bool,
    /// Case conversion
    pub case: Option<Case>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            padding: 0,
            pad_character: ' ',
            fixed_length: false,
            case: None,
        }
    }
}

impl RenderOptions {
    fn is_plain(&self) -> bool {
        self.padding == 0 && self.case.is_none()
    }
}

/// What a renderer produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererKind {
    /// Fixed text
    Literal(String),
    /// The formatted message
    Message,
    /// The level name
    Level,
    /// The logger name
    Logger,
    /// `yyyy-MM-dd HH:mm:ss.ffff`
    LongDate,
    /// `yyyy-MM-dd`
    ShortDate,
    /// `HH:mm:ss.ffff`
    Time,
    /// Timestamp with a strftime format
    Date(String),
    /// Milliseconds since the Unix epoch
    Ticks,
    /// Calling thread number
    ThreadId,
    /// Calling thread name
    ThreadName,
    /// Process id
    ProcessId,
    /// Event sequence number
    SequenceId,
    /// Line separator
    NewLine,
    /// Directory of the running executable
    BaseDir,
    /// Value of an environment variable
    Environment(String),
    /// Contents of the file named by a nested layout, empty if unreadable
    FileContents(Layout),
}

/// One parsed renderer with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRenderer {
    /// What to render
    pub kind: RendererKind,
    /// Padding and case options
    pub options: RenderOptions,
}

impl LayoutRenderer {
    fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: RendererKind::Literal(text.into()),
            options: RenderOptions::default(),
        }
    }

    /// Padding option, for convenience.
    pub fn padding(&self) -> i32 {
        self.options.padding
    }

    fn render_into(&self, event: &LogEvent, out: &mut String) {
        if self.options.is_plain() {
            self.render_raw(event, out);
            return;
        }

        let mut raw = String::new();
        self.render_raw(event, &mut raw);
        let raw = match self.options.case {
            Some(Case::Upper) => raw.to_uppercase(),
            Some(Case::Lower) => raw.to_lowercase(),
            None => raw,
        };
        apply_padding(&raw, &self.options, out);
    }

    fn render_raw(&self, event: &LogEvent, out: &mut String) {
        let ts = &event.timestamp;
        match &self.kind {
            RendererKind::Literal(text) => out.push_str(text),
            RendererKind::Message => out.push_str(&event.message),
            RendererKind::Level => out.push_str(event.level.as_str()),
            RendererKind::Logger => out.push_str(&event.logger_name),
            RendererKind::LongDate => {
                let _ = write!(
                    out,
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:04}",
                    ts.year(),
                    ts.month(),
                    ts.day(),
                    ts.hour(),
                    ts.minute(),
                    ts.second(),
                    sub_millis(ts.nanosecond())
                );
            }
            RendererKind::ShortDate => {
                let _ = write!(out, "{:04}-{:02}-{:02}", ts.year(), ts.month(), ts.day());
            }
            RendererKind::Time => {
                let _ = write!(
                    out,
                    "{:02}:{:02}:{:02}.{:04}",
                    ts.hour(),
                    ts.minute(),
                    ts.second(),
                    sub_millis(ts.nanosecond())
                );
            }
            // An invalid strftime pattern makes the write fail; the partial output is kept.
            RendererKind::Date(format) => {
                let _ = write!(out, "{}", ts.format(format));
            }
            RendererKind::Ticks => {
                let _ = write!(out, "{}", ts.timestamp_millis());
            }
            RendererKind::ThreadId => {
                let _ = write!(out, "{}", event.thread_id);
            }
            RendererKind::ThreadName => {
                if let Some(name) = &event.thread_name {
                    out.push_str(name);
                }
            }
            RendererKind::ProcessId => {
                let _ = write!(out, "{}", std::process::id());
            }
            RendererKind::SequenceId => {
                let _ = write!(out, "{}", event.sequence_id);
            }
            RendererKind::NewLine => out.push_str(LINE_ENDING),
            RendererKind::BaseDir => out.push_str(&BASE_DIR),
            RendererKind::Environment(variable) => {
                if let Ok(value) = std::env::var(variable) {
                    out.push_str(&value);
                }
            }
            RendererKind::FileContents(file_name) => {
                if let Ok(contents) = std::fs::read_to_string(file_name.render(event)) {
                    out.push_str(&contents);
                }
            }
        }
    }
}

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Fraction of a second in units of 100 microseconds.
fn sub_millis(nanos: u32) -> u32 {
    (nanos % 1_000_000_000) / 100_000
}

fn apply_padding(raw: &str, options: &RenderOptions, out: &mut String) {
    let width = (options.padding.unsigned_abs() as usize).min(MAX_MESSAGE_LEN);
    let len = raw.chars().count();

    if len >= width {
        if options.fixed_length && width > 0 {
            // Left padding keeps the end of the value, right padding its start.
            if options.padding > 0 {
                out.extend(raw.chars().skip(len - width));
            } else {
                out.extend(raw.chars().take(width));
            }
        } else {
            out.push_str(raw);
        }
        return;
    }

    let fill = std::iter::repeat(options.pad_character).take(width - len);
    if options.padding > 0 {
        out.extend(fill);
        out.push_str(raw);
    } else {
        out.push_str(raw);
        out.extend(fill);
    }
}

/// A parsed layout.
///
/// ```
/// use logshim_core::layout::{Layout, RendererKind};
///
/// let layout = Layout::parse("${message:padding=10} ${level}");
/// assert_eq!(layout.renderers().len(), 3);
/// assert_eq!(layout.renderers()[0].kind, RendererKind::Message);
/// assert_eq!(layout.renderers()[0].padding(), 10);
/// assert_eq!(layout.text(), "${message:padding=10} ${level}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    text: String,
    renderers: Vec<LayoutRenderer>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::parse(DEFAULT_LAYOUT)
    }
}

impl Layout {
    /// Parse layout text.
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            renderers: parse_renderers(text),
        }
    }

    /// Layout text as given.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed renderers in order.
    pub fn renderers(&self) -> &[LayoutRenderer] {
        &self.renderers
    }

    /// Render an event to a new string.
    pub fn render(&self, event: &LogEvent) -> String {
        let mut out = String::with_capacity(event.message.len() + 64);
        self.render_into(event, &mut out);
        out
    }

    /// Render an event, appending to `out`.
    pub fn render_into(&self, event: &LogEvent, out: &mut String) {
        for renderer in &self.renderers {
            renderer.render_into(event, out);
        }
    }
}

fn parse_renderers(text: &str) -> Vec<LayoutRenderer> {
    let mut renderers = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find("${") {
        literal.push_str(&rest[..open]);
        let body_start = open + 2;
        match find_close(&rest[body_start..]) {
            Some(len) => {
                let body = &rest[body_start..body_start + len];
                let source = &rest[open..body_start + len + 1];
                match parse_directive(body) {
                    Some(renderer) => {
                        if !literal.is_empty() {
                            renderers.push(LayoutRenderer::literal(std::mem::take(&mut literal)));
                        }
                        renderers.push(renderer);
                    }
                    None => literal.push_str(source),
                }
                rest = &rest[body_start + len + 1..];
            }
            None => {
                // Unclosed directive: keep the remainder as text.
                literal.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        renderers.push(LayoutRenderer::literal(literal));
    }
    renderers
}

/// Length of a directive body up to its closing brace, honouring escapes and
/// nested `${...}`.
fn find_close(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '$' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                depth += 1;
            }
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split on unescaped `sep` outside nested directives.
fn split_unescaped(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '$' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                depth += 1;
            }
            '}' if depth > 0 => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_directive(body: &str) -> Option<LayoutRenderer> {
    let mut segments = split_unescaped(body, ':').into_iter();
    let name = segments.next()?.trim().to_lowercase();

    // Values stay raw until read, so nested layouts keep their escapes.
    let mut params: Vec<(Option<String>, &str)> = Vec::new();
    for segment in segments {
        let pair = split_unescaped(segment, '=');
        if pair.len() >= 2 {
            let key = unescape(pair[0]).trim().to_lowercase();
            let value_start = pair[0].len() + 1;
            params.push((Some(key), &segment[value_start..]));
        } else {
            params.push((None, segment));
        }
    }

    let default_param = |key: &str| unescape(raw_param(&params, key));

    let kind = match name.as_str() {
        "message" => RendererKind::Message,
        "level" => RendererKind::Level,
        "logger" => RendererKind::Logger,
        "longdate" => RendererKind::LongDate,
        "shortdate" => RendererKind::ShortDate,
        "time" => RendererKind::Time,
        "date" => {
            let format = default_param("format");
            RendererKind::Date(if format.is_empty() {
                "%Y/%m/%d %H:%M:%S%.3f".to_string()
            } else {
                format
            })
        }
        "ticks" => RendererKind::Ticks,
        "threadid" => RendererKind::ThreadId,
        "threadname" => RendererKind::ThreadName,
        "processid" => RendererKind::ProcessId,
        "sequenceid" | "counter" => RendererKind::SequenceId,
        "newline" => RendererKind::NewLine,
        "basedir" => RendererKind::BaseDir,
        "environment" | "env" => RendererKind::Environment(default_param("variable")),
        "literal" => RendererKind::Literal(default_param("text")),
        "file-contents" => RendererKind::FileContents(Layout::parse(raw_param(&params, "filename"))),
        _ => return None,
    };

    let mut options = RenderOptions::default();
    for (key, value) in &params {
        let Some(key) = key.as_deref() else { continue };
        let value = unescape(value);
        let value = value.trim();
        match key {
            "padding" => {
                if let Ok(padding) = value.parse() {
                    options.padding = padding;
                }
            }
            "padcharacter" => {
                if let Some(c) = value.chars().next() {
                    options.pad_character = c;
                }
            }
            "fixedlength" => options.fixed_length = is_true(value),
            "uppercase" if is_true(value) => options.case = Some(Case::Upper),
            "lowercase" if is_true(value) => options.case = Some(Case::Lower),
            _ => {}
        }
    }

    Some(LayoutRenderer { kind, options })
}

/// The unnamed parameter, or else the one named `key`.
fn raw_param<'a>(params: &[(Option<String>, &'a str)], key: &str) -> &'a str {
    params
        .iter()
        .find_map(|(k, v)| match k.as_deref() {
            None => Some(*v),
            Some(k) if k == key => Some(*v),
            _ => None,
        })
        .unwrap_or_default()
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
