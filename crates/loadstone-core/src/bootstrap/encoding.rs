//! One-time system text-encoding detection.
//!
//! Detection runs once per process; a process detached from its
//! controlling terminal afterwards keeps the stale value. Consumers
//! must treat the published constant as fixed.

use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::debug;

/// Generic default when the environment gives no usable signal.
const PLATFORM_DEFAULT: &str = "utf-8";

static SYSTEM_ENCODING: OnceLock<String> = OnceLock::new();

/// The process-wide text encoding. Detected on first read and fixed
/// for the process lifetime; never empty.
pub fn system_encoding() -> &'static str {
    SYSTEM_ENCODING.get_or_init(detect_system_encoding).as_str()
}

fn detect_system_encoding() -> String {
    select_encoding(stdin_encoding(), locale_encoding(), Some(PLATFORM_DEFAULT))
}

/// Fold the detection tiers into a final value. The last tier is
/// unconditional, so the result is non-empty by construction.
fn select_encoding(
    stdin: Option<String>,
    locale: Option<String>,
    platform_default: Option<&str>,
) -> String {
    stdin
        .or(locale)
        .or_else(|| platform_default.map(str::to_string))
        .unwrap_or_else(|| os_family_fallback().to_string())
}

/// Encoding of the attached standard input, where one exists. On
/// non-Windows hosts an attached terminal most commonly matches the
/// filesystem encoding, so the locale codeset stands in for it;
/// Windows reports terminal encodings unreliably and is skipped.
fn stdin_encoding() -> Option<String> {
    if cfg!(windows) {
        return None;
    }
    if std::io::stdin().is_terminal() {
        locale_encoding()
    } else {
        None
    }
}

/// Codeset from the host locale configuration, consulting `LC_ALL`,
/// `LC_CTYPE`, then `LANG`. An unset or malformed locale is no
/// answer, never an error.
fn locale_encoding() -> Option<String> {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.is_empty()))
        .and_then(|value| parse_locale(&value))
}

fn parse_locale(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "C" || value == "POSIX" {
        return None;
    }
    // "en_US.UTF-8@euro" -> "UTF-8"
    let codeset = value.split('.').nth(1)?;
    let codeset = codeset.split('@').next().unwrap_or(codeset);
    let valid = !codeset.is_empty()
        && codeset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        debug!(locale = value, "ignoring malformed locale setting");
        return None;
    }
    Some(codeset.to_ascii_lowercase())
}

const fn os_family_fallback() -> &'static str {
    if cfg!(target_os = "macos") {
        "utf-8"
    } else if cfg!(windows) {
        "mbcs"
    } else {
        "ascii"
    }
}
