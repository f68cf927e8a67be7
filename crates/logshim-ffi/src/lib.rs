//! C ABI for logshim.
//!
//! Every entry point is panic-free from the caller's point of view, treats
//! null pointers as "nothing to do" and returns `1`/`0` where a status
//! exists. Narrow strings are NUL-terminated bytes decoded as UTF-8 (invalid
//! sequences replaced); wide strings are NUL-terminated UTF-16.
//!
//! C variadics cannot be received on stable Rust, so format arguments are
//! passed as an array of tagged [`LogShimArg`] values. See
//! `include/logshim.h` for the matching declarations.

use logshim_core::{api, FormatArg, Level, LogManager};
use std::borrow::Cow;
use std::ffi::{c_char, c_int, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Signed integer, read from `value.int`.
pub const LOGSHIM_ARG_INT: u32 = 0;
/// Unsigned integer, read from `value.uint`.
pub const LOGSHIM_ARG_UINT: u32 = 1;
/// Floating point, read from `value.float`.
pub const LOGSHIM_ARG_FLOAT: u32 = 2;
/// Unicode scalar value, read from `value.uint`.
pub const LOGSHIM_ARG_CHAR: u32 = 3;
/// Narrow string, read from `value.str`.
pub const LOGSHIM_ARG_STR: u32 = 4;
/// Wide string, read from `value.wstr`.
pub const LOGSHIM_ARG_WSTR: u32 = 5;
/// Pointer, read from `value.ptr`.
pub const LOGSHIM_ARG_PTR: u32 = 6;

/// Payload of a [`LogShimArg`].
#[repr(C)]
#[derive(Clone, Copy)]
pub union LogShimArgValue {
    /// `LOGSHIM_ARG_INT`
    pub int: i64,
    /// `LOGSHIM_ARG_UINT`, `LOGSHIM_ARG_CHAR`
    pub uint: u64,
    /// `LOGSHIM_ARG_FLOAT`
    pub float: f64,
    /// `LOGSHIM_ARG_STR`
    pub str: *const c_char,
    /// `LOGSHIM_ARG_WSTR`
    pub wstr: *const u16,
    /// `LOGSHIM_ARG_PTR`
    pub ptr: usize,
}

/// One tagged format argument.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct LogShimArg {
    /// One of the `LOGSHIM_ARG_*` constants
    pub kind: u32,
    /// Payload selected by `kind`
    pub value: LogShimArgValue,
}

/// Run `f`, turning a panic into `default`.
fn guarded<T>(default: T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!(target: "logshim::internal", "panic caught at the C boundary");
            default
        }
    }
}

fn status(ok: bool) -> c_int {
    c_int::from(ok)
}

fn level_of(level: c_int) -> Option<Level> {
    Level::from_ordinal(level)
}

unsafe fn narrow<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy())
}

unsafe fn wide<'a>(ptr: *const u16) -> Option<&'a [u16]> {
    if ptr.is_null() {
        return None;
    }
    let mut len = 0;
    while *ptr.add(len) != 0 {
        len += 1;
    }
    Some(std::slice::from_raw_parts(ptr, len))
}

unsafe fn arg_slice<'a>(args: *const LogShimArg, nargs: usize) -> &'a [LogShimArg] {
    if args.is_null() || nargs == 0 {
        return &[];
    }
    std::slice::from_raw_parts(args, nargs)
}

/// An argument with its text decoded, ready to be borrowed by [`FormatArg`].
enum Staged<'a> {
    Value(FormatArg<'static>),
    Text(Cow<'a, str>),
    Wide(&'a [u16]),
}

impl<'a> Staged<'a> {
    unsafe fn from_raw(arg: &LogShimArg) -> Self {
        let value = arg.value;
        match arg.kind {
            LOGSHIM_ARG_INT => Staged::Value(FormatArg::Int(value.int)),
            LOGSHIM_ARG_UINT => Staged::Value(FormatArg::UInt(value.uint)),
            LOGSHIM_ARG_FLOAT => Staged::Value(FormatArg::Float(value.float)),
            LOGSHIM_ARG_CHAR => {
                let c = u32::try_from(value.uint)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Staged::Value(FormatArg::Char(c))
            }
            LOGSHIM_ARG_STR => Staged::Text(narrow(value.str).unwrap_or(Cow::Borrowed("(null)"))),
            LOGSHIM_ARG_WSTR => match wide(value.wstr) {
                Some(units) => Staged::Wide(units),
                None => Staged::Text(Cow::Borrowed("(null)")),
            },
            LOGSHIM_ARG_PTR => Staged::Value(FormatArg::Ptr(value.ptr)),
            _ => Staged::Text(Cow::Borrowed("")),
        }
    }

    fn as_arg(&self) -> FormatArg<'_> {
        match self {
            Staged::Value(arg) => *arg,
            Staged::Text(text) => FormatArg::Str(text),
            Staged::Wide(units) => FormatArg::Wide(units),
        }
    }
}

unsafe fn stage<'a>(args: *const LogShimArg, nargs: usize) -> Vec<Staged<'a>> {
    arg_slice(args, nargs).iter().map(|a| Staged::from_raw(a)).collect()
}

/// Install the configuration file at `path` as the engine resource.
///
/// Only the first successful call has an effect; later calls return 1.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn logshim_init_a(path: *const c_char) -> c_int {
    guarded(0, || match narrow(path) {
        Some(path) => status(api::initialize(&path)),
        None => 0,
    })
}

/// Wide variant of [`logshim_init_a`].
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[no_mangle]
pub unsafe extern "C" fn logshim_init_w(path: *const u16) -> c_int {
    guarded(0, || match wide(path) {
        Some(path) => status(api::initialize_wide(path)),
        None => 0,
    })
}

/// Install `logshim.yaml` next to the executable as the engine resource.
#[no_mangle]
pub extern "C" fn logshim_init_local() -> c_int {
    guarded(0, || status(api::initialize_local()))
}

/// Replace the active configuration with the file at `path`.
///
/// Returns 0, keeping the active configuration, on any failure.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn logshim_configure_from_file_a(path: *const c_char) -> c_int {
    guarded(0, || match narrow(path) {
        Some(path) => status(api::load_configuration_from_file(&path)),
        None => 0,
    })
}

/// Wide variant of [`logshim_configure_from_file_a`].
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated UTF-16 string.
#[no_mangle]
pub unsafe extern "C" fn logshim_configure_from_file_w(path: *const u16) -> c_int {
    guarded(0, || match wide(path) {
        Some(path) => status(api::load_configuration_from_file_wide(path)),
        None => 0,
    })
}

/// 1 if `logger` has any target at `level` (0 = trace ... 5 = fatal).
///
/// # Safety
///
/// `logger` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn logshim_is_enabled_a(level: c_int, logger: *const c_char) -> c_int {
    guarded(0, || match (level_of(level), narrow(logger)) {
        (Some(level), Some(logger)) => status(api::is_enabled(level, &logger)),
        _ => 0,
    })
}

/// Wide variant of [`logshim_is_enabled_a`].
///
/// # Safety
///
/// `logger` must be null or a valid NUL-terminated UTF-16 string.
#[no_mangle]
pub unsafe extern "C" fn logshim_is_enabled_w(level: c_int, logger: *const u16) -> c_int {
    guarded(0, || match (level_of(level), wide(logger)) {
        (Some(level), Some(logger)) => status(api::is_enabled_wide(level, logger)),
        _ => 0,
    })
}

/// Format `template` with `nargs` arguments and log it.
///
/// Arguments are only read when the level is enabled for `logger`.
///
/// # Safety
///
/// `logger` and `template` must be null or valid NUL-terminated strings.
/// `args` must be null or point to `nargs` arguments whose string payloads
/// are valid for their kind.
#[no_mangle]
pub unsafe extern "C" fn logshim_log_a(
    level: c_int,
    logger: *const c_char,
    template: *const c_char,
    args: *const LogShimArg,
    nargs: usize,
) {
    guarded((), || {
        let (Some(level), Some(logger), Some(template)) = (level_of(level), narrow(logger), narrow(template))
        else {
            return;
        };
        let logger = LogManager::get_logger(&logger);
        if !logger.is_enabled(level) {
            return;
        }
        let staged = stage(args, nargs);
        let args: Vec<FormatArg<'_>> = staged.iter().map(Staged::as_arg).collect();
        logger.log(level, &template, &args);
    })
}

/// Wide variant of [`logshim_log_a`].
///
/// # Safety
///
/// Same as [`logshim_log_a`], with UTF-16 `logger` and `template`.
#[no_mangle]
pub unsafe extern "C" fn logshim_log_w(
    level: c_int,
    logger: *const u16,
    template: *const u16,
    args: *const LogShimArg,
    nargs: usize,
) {
    guarded((), || {
        let (Some(level), Some(logger), Some(template)) = (level_of(level), wide(logger), wide(template))
        else {
            return;
        };
        let logger = LogManager::get_logger(&String::from_utf16_lossy(logger));
        if !logger.is_enabled(level) {
            return;
        }
        let staged = stage(args, nargs);
        let args: Vec<FormatArg<'_>> = staged.iter().map(Staged::as_arg).collect();
        logger.log_wide(level, template, &args);
    })
}

macro_rules! level_entry_points {
    ($($level:ident => $narrow:ident, $wide:ident;)*) => {$(
        #[doc = concat!("[`logshim_log_a`] at `", stringify!($level), "`.")]
        ///
        /// # Safety
        ///
        /// Same as [`logshim_log_a`].
        #[no_mangle]
        pub unsafe extern "C" fn $narrow(
            logger: *const c_char,
            template: *const c_char,
            args: *const LogShimArg,
            nargs: usize,
        ) {
            logshim_log_a(Level::$level.ordinal() as c_int, logger, template, args, nargs)
        }

        #[doc = concat!("[`logshim_log_w`] at `", stringify!($level), "`.")]
        ///
        /// # Safety
        ///
        /// Same as [`logshim_log_w`].
        #[no_mangle]
        pub unsafe extern "C" fn $wide(
            logger: *const u16,
            template: *const u16,
            args: *const LogShimArg,
            nargs: usize,
        ) {
            logshim_log_w(Level::$level.ordinal() as c_int, logger, template, args, nargs)
        }
    )*};
}

level_entry_points! {
    Trace => logshim_trace_a, logshim_trace_w;
    Debug => logshim_debug_a, logshim_debug_w;
    Info => logshim_info_a, logshim_info_w;
    Warn => logshim_warn_a, logshim_warn_w;
    Error => logshim_error_a, logshim_error_w;
    Fatal => logshim_fatal_a, logshim_fatal_w;
}

/// Flush every target of the active configuration.
#[no_mangle]
pub extern "C" fn logshim_flush() {
    guarded((), LogManager::flush)
}

/// Install the empty configuration, releasing all targets.
#[no_mangle]
pub extern "C" fn logshim_shutdown() {
    guarded((), LogManager::shutdown)
}
