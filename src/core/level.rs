//! Severity level definitions

use super::error::LoggerError;
use parking_lot::Mutex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// Names of levels built at runtime, leaked once per distinct name
static INTERNED_NAMES: Mutex<BTreeSet<&'static str>> = parking_lot::const_mutex(BTreeSet::new());

fn intern(name: &str) -> &'static str {
    let mut names = INTERNED_NAMES.lock();
    if let Some(existing) = names.get(name) {
        return *existing;
    }
    let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
    names.insert(leaked);
    leaked
}

/// Named severity value.
///
/// Levels compare, order and hash by their numeric value only, so a custom
/// level that shares a value with a canonical one is equal to it.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    name: &'static str,
    value: i32,
}

impl Level {
    /// Enables every message
    pub const ALL: Level = Level::new("ALL", 0);
    pub const FINEST: Level = Level::new("FINEST", 300);
    pub const FINER: Level = Level::new("FINER", 400);
    pub const FINE: Level = Level::new("FINE", 500);
    pub const CONFIG: Level = Level::new("CONFIG", 700);
    pub const INFO: Level = Level::new("INFO", 800);
    pub const WARNING: Level = Level::new("WARNING", 900);
    pub const SEVERE: Level = Level::new("SEVERE", 1000);
    pub const SHOUT: Level = Level::new("SHOUT", 1200);
    /// Disables every message
    pub const OFF: Level = Level::new("OFF", 2000);

    /// Canonical levels in ascending order
    pub const LEVELS: [Level; 10] = [
        Level::ALL,
        Level::FINEST,
        Level::FINER,
        Level::FINE,
        Level::CONFIG,
        Level::INFO,
        Level::WARNING,
        Level::SEVERE,
        Level::SHOUT,
        Level::OFF,
    ];

    /// Create a level with an arbitrary name and value
    pub const fn new(name: &'static str, value: i32) -> Self {
        Self { name, value }
    }

    /// Create a level whose name is only known at runtime.
    ///
    /// Returns the canonical level when both name and value match one;
    /// otherwise the name is interned for the life of the process.
    pub fn custom(name: &str, value: i32) -> Self {
        match Self::canonical(value) {
            Some(level) if level.name.eq_ignore_ascii_case(name) => level,
            _ => Self::new(intern(name), value),
        }
    }

    /// Whether this is one of the `LEVELS` constants, name included
    pub fn is_canonical(&self) -> bool {
        Self::canonical(self.value).is_some_and(|level| level.name == self.name)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Find the canonical level with exactly this value
    pub fn canonical(value: i32) -> Option<Level> {
        Self::LEVELS.iter().copied().find(|level| level.value == value)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Level {}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(Level::ALL),
            "FINEST" => Ok(Level::FINEST),
            "FINER" => Ok(Level::FINER),
            "FINE" => Ok(Level::FINE),
            "CONFIG" => Ok(Level::CONFIG),
            "INFO" => Ok(Level::INFO),
            "WARNING" | "WARN" => Ok(Level::WARNING),
            "SEVERE" => Ok(Level::SEVERE),
            "SHOUT" => Ok(Level::SHOUT),
            "OFF" => Ok(Level::OFF),
            _ => Err(LoggerError::UnknownLevel(s.to_string())),
        }
    }
}

/// Canonical levels serialize as their name, custom ones as `{name, value}`
impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_canonical() {
            return serializer.serialize_str(self.name);
        }
        let mut state = serializer.serialize_struct("Level", 2)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Name(String),
    Value(i32),
    Custom { name: String, value: i32 },
}

/// Accepts a canonical name, a bare numeric value or `{name, value}`
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LevelRepr::deserialize(deserializer)? {
            LevelRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
            LevelRepr::Value(value) => Ok(Level::canonical(value)
                .unwrap_or_else(|| Level::custom(&value.to_string(), value))),
            LevelRepr::Custom { name, value } => Ok(Level::custom(&name, value)),
        }
    }
}
