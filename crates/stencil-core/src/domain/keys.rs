//! Recursive key-case rewriting.
//!
//! [`KeyTransformer`] rebuilds a [`ConfigValue`] tree with every mapping key
//! rewritten to a [`KeyCase`], except where a path-aware predicate says to
//! keep the original spelling. The walk follows [`SharedNode`] references and
//! fails with [`DomainError::CircularReference`] as soon as one of them
//! leads back to a node that is still being processed.
//!
//! [`SharedNode`]: super::value::SharedNode

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::DomainError;
use super::value::{ConfigValue, Mapping};

/// Default limit on the number of key segments between the root and a node.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ============================================================================
// KeyPath
// ============================================================================

/// Keys from the root to the current node.
///
/// Paths are values: [`KeyPath::child`] returns a new path and leaves the
/// parent untouched, so a predicate that keeps a path around never sees it
/// change under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Arc<[String]>);

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path such as `services.web.environment`.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(dotted.split('.').map(str::to_string).collect())
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.to_vec();
        segments.push(key.into());
        Self(segments.into())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, i.e. the key of the current node.
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// `true` when `prefix` matches the leading segments of this path.
    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

// ============================================================================
// KeyCase
// ============================================================================

/// Naming convention applied to rewritten keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCase {
    /// `dependsOn` → `depends_on`
    #[default]
    Snake,
    /// `dependsOn` → `depends-on`
    Kebab,
    /// `depends_on` → `dependsOn`
    Camel,
    /// `depends_on` → `DependsOn`
    Pascal,
    /// `dependsOn` → `DEPENDS_ON`
    ScreamingSnake,
}

impl KeyCase {
    /// Rewrite `key` to this case.
    ///
    /// Words break where a lowercase letter or digit meets an uppercase
    /// letter, and before the last capital of an acronym (`XMLHttp`). Every
    /// other character is kept, so `$schema`, `//` and `x-custom` pass
    /// through the separated cases untouched. Camel and Pascal also join
    /// words across a `_` or `-` that sits between two alphanumerics.
    pub fn apply(self, key: &str) -> String {
        match self {
            Self::Snake => separated(key, '_', str::to_lowercase),
            Self::Kebab => separated(key, '-', str::to_lowercase),
            Self::ScreamingSnake => separated(key, '_', str::to_uppercase),
            Self::Camel => joined(key, false),
            Self::Pascal => joined(key, true),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snake => "snake",
            Self::Kebab => "kebab",
            Self::Camel => "camel",
            Self::Pascal => "pascal",
            Self::ScreamingSnake => "screaming",
        }
    }
}

impl fmt::Display for KeyCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snake" | "snake_case" => Ok(Self::Snake),
            "kebab" | "kebab-case" => Ok(Self::Kebab),
            "camel" | "camelcase" => Ok(Self::Camel),
            "pascal" | "pascalcase" => Ok(Self::Pascal),
            "screaming" | "screaming_snake" | "shouty" => Ok(Self::ScreamingSnake),
            other => Err(format!("unknown key case '{other}'")),
        }
    }
}

// ============================================================================
// Word splitting
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Piece {
    Word(String),
    Break,
    Verbatim(char),
}

fn pieces(key: &str, split_on_separators: bool) -> Vec<Piece> {
    let chars: Vec<char> = key.chars().collect();
    let mut out = Vec::new();
    let mut word = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();

        if c.is_alphanumeric() {
            if !word.is_empty() && starts_word(prev, c, next) {
                out.push(Piece::Word(std::mem::take(&mut word)));
                out.push(Piece::Break);
            }
            word.push(c);
            continue;
        }

        if !word.is_empty() {
            out.push(Piece::Word(std::mem::take(&mut word)));
        }
        let joins_words = split_on_separators
            && matches!(c, '_' | '-')
            && prev.is_some_and(char::is_alphanumeric)
            && next.is_some_and(char::is_alphanumeric);
        out.push(if joins_words {
            Piece::Break
        } else {
            Piece::Verbatim(c)
        });
    }
    if !word.is_empty() {
        out.push(Piece::Word(word));
    }
    out
}

fn starts_word(prev: Option<char>, c: char, next: Option<char>) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if !c.is_uppercase() {
        return false;
    }
    prev.is_lowercase()
        || prev.is_numeric()
        || (prev.is_uppercase() && next.is_some_and(char::is_lowercase))
}

fn separated(key: &str, separator: char, word_case: fn(&str) -> String) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for piece in pieces(key, false) {
        match piece {
            Piece::Word(word) => out.push_str(&word_case(&word)),
            Piece::Break => out.push(separator),
            Piece::Verbatim(c) => out.push(c),
        }
    }
    out
}

fn joined(key: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(key.len());
    let mut first = true;
    for piece in pieces(key, true) {
        match piece {
            Piece::Word(word) if first && !capitalize_first => {
                out.push_str(&word.to_lowercase());
                first = false;
            }
            Piece::Word(word) => {
                out.push_str(&capitalize(&word));
                first = false;
            }
            Piece::Break => {}
            // `com.example` is two names, each starting over
            Piece::Verbatim(c) => {
                out.push(c);
                first = true;
            }
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(head) => head.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ============================================================================
// KeyTransformer
// ============================================================================

/// Decides, per key, whether the key is rewritten.
///
/// Receives the path of the key itself (parent path plus key) and the value
/// stored under it.
pub type KeyPredicate = dyn Fn(&KeyPath, &ConfigValue) -> bool + Send + Sync;

/// Rewrites mapping keys across a whole tree.
#[derive(Clone)]
pub struct KeyTransformer {
    case: KeyCase,
    predicate: Arc<KeyPredicate>,
    max_depth: usize,
}

impl Default for KeyTransformer {
    fn default() -> Self {
        Self::new(KeyCase::default())
    }
}

impl fmt::Debug for KeyTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTransformer")
            .field("case", &self.case)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl KeyTransformer {
    /// Transformer that rewrites every key to `case`.
    pub fn new(case: KeyCase) -> Self {
        Self {
            case,
            predicate: Arc::new(rewrite_all),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the rewrite predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&KeyPath, &ConfigValue) -> bool + Send + Sync + 'static,
    {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Keep the spelling of every key strictly below each of `prefixes`.
    ///
    /// The prefix key itself is still rewritten: with prefix `environment`,
    /// `environment` is converted but `environment.leaveThisAlone` is not.
    pub fn preserving_below<I, S>(self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes: Vec<KeyPath> = prefixes
            .into_iter()
            .map(|p| KeyPath::parse(p.as_ref()))
            .collect();
        self.with_predicate(move |path, _| {
            !prefixes
                .iter()
                .any(|prefix| path.len() > prefix.len() && path.starts_with(prefix))
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn case(&self) -> KeyCase {
        self.case
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Build a re-keyed copy of `value`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::CircularReference`] when a shared node is reached
    ///   again while it is still an ancestor of the current node.
    /// - [`DomainError::DepthExceeded`] when a path grows past
    ///   [`Self::max_depth`] keys.
    /// - [`DomainError::KeyCollision`] when two keys of one mapping end up
    ///   with the same spelling.
    pub fn transform(&self, value: &ConfigValue) -> Result<ConfigValue, DomainError> {
        trace!(case = %self.case, max_depth = self.max_depth, "transforming keys");
        self.walk(value, &KeyPath::root(), &mut Vec::new())
    }

    fn walk(
        &self,
        value: &ConfigValue,
        path: &KeyPath,
        ancestors: &mut Vec<usize>,
    ) -> Result<ConfigValue, DomainError> {
        match value {
            ConfigValue::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, child) in map {
                    let child_path = path.child(key.as_str());
                    if child_path.len() > self.max_depth {
                        return Err(DomainError::DepthExceeded {
                            path: child_path.to_string(),
                            max_depth: self.max_depth,
                        });
                    }

                    let new_key = if (self.predicate)(&child_path, child) {
                        self.case.apply(key)
                    } else {
                        key.clone()
                    };
                    if out.contains_key(&new_key) {
                        return Err(DomainError::KeyCollision {
                            path: child_path.to_string(),
                            key: new_key,
                        });
                    }
                    let rewritten = self.walk(child, &child_path, ancestors)?;
                    out.insert(new_key, rewritten);
                }
                Ok(ConfigValue::Mapping(out))
            }
            ConfigValue::Sequence(items) => items
                .iter()
                .map(|item| self.walk(item, path, ancestors))
                .collect::<Result<Vec<_>, _>>()
                .map(ConfigValue::Sequence),
            ConfigValue::Shared(node) => {
                let id = node.id();
                if ancestors.contains(&id) {
                    return Err(DomainError::CircularReference {
                        path: path.to_string(),
                    });
                }

                ancestors.push(id);
                let result = self.walk(&node.read(), path, ancestors);
                ancestors.pop();
                result
            }
            other => Ok(other.clone()),
        }
    }
}

fn rewrite_all(_: &KeyPath, _: &ConfigValue) -> bool {
    true
}

/// Rewrite every key in `value` to snake case.
pub fn decamelize_keys(value: &ConfigValue) -> Result<ConfigValue, DomainError> {
    KeyTransformer::default().transform(value)
}
