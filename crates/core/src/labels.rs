//! Closed label enums exchanged with clients as case-sensitive strings.
//!
//! Each enum is stored in the database as its canonical label and parsed
//! back through [`TryFrom<String>`]. A few variants also accept the spaced
//! spelling used by the original web client (e.g. `"Not started"`); those
//! aliases are accepted on input only and never emitted.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CoreError;

macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($what:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Canonical wire label.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Parse a wire label. Matching is case-sensitive.
            pub fn parse(label: &str) -> Result<Self, CoreError> {
                match label {
                    $( $label $(| $alias)* => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $what,
                        other,
                        [$( $label ),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

define_label_enum! {
    /// Project progress.
    #[derive(Default)]
    ProjectStatus("status") {
        #[default]
        NotStarted => "NotStarted" | "Not started",
        Wip => "WIP",
        Finished => "Finished",
    }
}

impl ProjectStatus {
    /// Whether work on the project has begun (WIP or Finished).
    pub fn is_started(self) -> bool {
        matches!(self, ProjectStatus::Wip | ProjectStatus::Finished)
    }
}

define_label_enum! {
    /// Pattern difficulty.
    #[derive(Default)]
    Difficulty("difficulty") {
        #[default]
        Beginner => "Beginner",
        Easy => "Easy",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
    }
}

define_label_enum! {
    /// Yarn fiber composition.
    FiberContent("fiber content") {
        Cotton => "Cotton",
        Wool => "Wool",
        Acrylic => "Acrylic",
        Bamboo => "Bamboo",
        Alpaca => "Alpaca",
        Linen => "Linen",
        Silk => "Silk",
        Mixed => "Mixed",
    }
}

define_label_enum! {
    /// Standard yarn weight class.
    YarnWeight("yarn weight") {
        SuperFine => "SuperFine" | "Super Fine",
        Fine => "Fine",
        Light => "Light",
        Medium => "Medium",
        Bulky => "Bulky",
        SuperBulky => "SuperBulky" | "Super Bulky",
    }
}
