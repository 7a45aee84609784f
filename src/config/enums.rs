//! Dashboard vocabulary: submission model, dashboard stages, trigger, and run mode.
//!
//! All four parse case-insensitively from their CTest spellings and display in canonical case, which is
//! also what the generated files contain.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::CtestError;

macro_rules! spelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal { $($variant:ident => $spelling:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
        #[serde(try_from = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $spelling),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CtestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let choices: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        CtestError::validation(format!(
                            "invalid {} '{}' (expected one of: {})",
                            $what,
                            s,
                            choices.join(", ")
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = CtestError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}

spelled_enum! {
    /// CDash submission model (track).
    Model, "submission model" {
        Nightly => "Nightly",
        Continuous => "Continuous",
        Experimental => "Experimental",
    }
}

spelled_enum! {
    /// One step of a dashboard script.
    Stage, "stage" {
        Build => "Build",
        Test => "Test",
        Coverage => "Coverage",
        MemCheck => "MemCheck",
        Submit => "Submit",
    }
}

spelled_enum! {
    /// The stage after which results are submitted to the dashboard.
    Trigger, "submit trigger" {
        Build => "Build",
        Test => "Test",
        Coverage => "Coverage",
        MemCheck => "MemCheck",
        Submit => "Submit",
        None => "None",
    }
}

spelled_enum! {
    /// Which dashboard script `ctest -S` runs. `Stages` runs an explicit stage list.
    Mode, "mode" {
        Build => "Build",
        Test => "Test",
        Coverage => "Coverage",
        MemCheck => "MemCheck",
        Submit => "Submit",
        Stages => "Stages",
    }
}

impl Trigger {
    /// The stage this trigger fires after, if any.
    pub fn stage(self) -> Option<Stage> {
        match self {
            Trigger::Build => Some(Stage::Build),
            Trigger::Test => Some(Stage::Test),
            Trigger::Coverage => Some(Stage::Coverage),
            Trigger::MemCheck => Some(Stage::MemCheck),
            Trigger::Submit => Some(Stage::Submit),
            Trigger::None => None,
        }
    }
}

impl Mode {
    /// Stages a mode runs when no explicit list is supplied.
    pub fn default_stages(self) -> &'static [Stage] {
        match self {
            Mode::Build => &[Stage::Build],
            Mode::Test => &[Stage::Build, Stage::Test],
            Mode::Coverage => &[Stage::Build, Stage::Test, Stage::Coverage],
            Mode::MemCheck => &[Stage::Build, Stage::Test, Stage::MemCheck],
            Mode::Submit => &[Stage::Submit],
            Mode::Stages => &[],
        }
    }

    /// File name of the dashboard script for this mode.
    pub fn script_name(self) -> String {
        format!("{}.cmake", self.as_str())
    }
}
