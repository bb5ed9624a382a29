//! Function identifiers per pipeline stage.
//!
//! Every function referenced from a configuration resolves to one of these
//! kinds. Built-ins get their own variant; anything else is `Custom` and is
//! only valid once registered. Registries are keyed by kind, so registering a
//! function under a built-in name replaces the built-in.

use std::fmt;

/// A pipeline stage, used in error context and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Source,
    Mapper,
    Reducer,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Mapper => "mapper",
            Self::Reducer => "reducer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of the per-stage kind enums.
pub trait FunctionKind: Clone + Eq + std::hash::Hash + fmt::Display {
    const STAGE: Stage;

    /// Resolve a configured name. Unknown names become `Custom`.
    fn from_name(name: &str) -> Self;

    /// Canonical name of this kind.
    fn as_str(&self) -> &str;

    /// Whether this kind ships with the default registry.
    fn is_builtin(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKind {
    GetValue,
    AlternateValue,
    Custom(String),
}

impl FunctionKind for SourceKind {
    const STAGE: Stage = Stage::Source;

    fn from_name(name: &str) -> Self {
        match name {
            "getValue" => Self::GetValue,
            "alternateValue" => Self::AlternateValue,
            other => Self::Custom(other.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::GetValue => "getValue",
            Self::AlternateValue => "alternateValue",
            Self::Custom(name) => name,
        }
    }

    fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapperKind {
    NotBlank,
    NotEqual,
    Replace,
    Custom(String),
}

impl FunctionKind for MapperKind {
    const STAGE: Stage = Stage::Mapper;

    fn from_name(name: &str) -> Self {
        match name {
            "notBlank" => Self::NotBlank,
            "notEqual" => Self::NotEqual,
            "replace" => Self::Replace,
            other => Self::Custom(other.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::NotBlank => "notBlank",
            Self::NotEqual => "notEqual",
            Self::Replace => "replace",
            Self::Custom(name) => name,
        }
    }

    fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReducerKind {
    First,
    Highest,
    Lowest,
    Unique,
    AnyMatch,
    Custom(String),
}

impl FunctionKind for ReducerKind {
    const STAGE: Stage = Stage::Reducer;

    fn from_name(name: &str) -> Self {
        match name {
            "first" => Self::First,
            "highest" => Self::Highest,
            "lowest" => Self::Lowest,
            "unique" => Self::Unique,
            "anyMatch" => Self::AnyMatch,
            other => Self::Custom(other.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::First => "first",
            Self::Highest => "highest",
            Self::Lowest => "lowest",
            Self::Unique => "unique",
            Self::AnyMatch => "anyMatch",
            Self::Custom(name) => name,
        }
    }

    fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

macro_rules! display_via_as_str {
    ($($kind:ty),*) => {
        $(impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(FunctionKind::as_str(self))
            }
        })*
    };
}

display_via_as_str!(SourceKind, MapperKind, ReducerKind);
