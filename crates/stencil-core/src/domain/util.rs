//! Small value helpers used wherever file metadata or identifiers are produced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remove repeated elements, keeping the first occurrence of each.
pub fn dedup<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// POSIX mode of a generated file, derived from two flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    /// `500`
    ReadOnlyExecutable,
    /// `400`
    ReadOnly,
    /// `755`
    Executable,
    /// `644`
    #[default]
    Regular,
}

impl FileMode {
    pub const fn from_flags(readonly: bool, executable: bool) -> Self {
        match (readonly, executable) {
            (true, true) => Self::ReadOnlyExecutable,
            (true, false) => Self::ReadOnly,
            (false, true) => Self::Executable,
            (false, false) => Self::Regular,
        }
    }

    /// Three-digit permission string, e.g. `"644"`.
    pub const fn triplet(self) -> &'static str {
        match self {
            Self::ReadOnlyExecutable => "500",
            Self::ReadOnly => "400",
            Self::Executable => "755",
            Self::Regular => "644",
        }
    }

    /// Numeric mode bits for `chmod`.
    pub const fn bits(self) -> u32 {
        match self {
            Self::ReadOnlyExecutable => 0o500,
            Self::ReadOnly => 0o400,
            Self::Executable => 0o755,
            Self::Regular => 0o644,
        }
    }

    pub const fn is_readonly(self) -> bool {
        matches!(self, Self::ReadOnlyExecutable | Self::ReadOnly)
    }

    pub const fn is_executable(self) -> bool {
        matches!(self, Self::ReadOnlyExecutable | Self::Executable)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.triplet())
    }
}

/// Permission triplet for a file with the given flags.
pub const fn permission_triplet(readonly: bool, executable: bool) -> &'static str {
    FileMode::from_flags(readonly, executable).triplet()
}

/// Turn an identifier such as `foo-bar.baz` into a module name (`foo_bar_baz`).
///
/// Every run of characters outside `[A-Za-z0-9]` becomes one underscore.
pub fn normalize_module_name(identifier: &str) -> String {
    collapse_separators(identifier, false)
}

/// Spelling of an enum member for a free-form value: `public-read` →
/// `PUBLIC_READ`.
///
/// Total: separators at either end are trimmed, an empty result becomes `_`,
/// and a leading digit gets a `_` prefix so the output is always a valid
/// identifier.
pub fn enum_member_name(value: &str) -> String {
    let collapsed = collapse_separators(value, true);
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

fn collapse_separators(input: &str, uppercase: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_separator = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(if uppercase { c.to_ascii_uppercase() } else { c });
            in_separator = false;
        } else if !in_separator {
            out.push('_');
            in_separator = true;
        }
    }
    out
}

/// Interpret an environment-style flag.
///
/// Unset, empty, `false`, `0` and `null` (any case) are false; everything
/// else is true.
pub fn is_truthy(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "null"
        ),
    }
}
