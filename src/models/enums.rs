use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an enum from its wire string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + FromStr, serialized by wire string.
///
/// Serde goes through the wire strings (not variant names) so persisted
/// profiles and frontend payloads keep the original `MEDICATION`-style tags.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(ScanMode {
    Medication => "MEDICATION",
    Meal => "MEAL",
    LabResult => "LAB_RESULT",
});

str_enum!(RiskLevel {
    Safe => "SAFE",
    Caution => "CAUTION",
    Danger => "DANGER",
    Info => "INFO",
});

str_enum!(MessageRole {
    User => "user",
    Model => "model",
});

str_enum!(Theme {
    Light => "light",
    Dark => "dark",
});

impl ScanMode {
    /// All scan modes, in the order the scanner presents them.
    pub const ALL: [ScanMode; 3] = [ScanMode::Medication, ScanMode::Meal, ScanMode::LabResult];
}
