use serde::{Deserialize, Serialize};

/// A string did not match any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Variants serialize as their canonical string.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Case-insensitive match against the canonical strings.
            pub fn parse_loose(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
            }

            /// Canonical strings joined for error messages.
            pub fn choices() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name),
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
    };
}

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

str_enum!(BloodType {
    APositive => "A+",
    ANegative => "A-",
    BPositive => "B+",
    BNegative => "B-",
    AbPositive => "AB+",
    AbNegative => "AB-",
    OPositive => "O+",
    ONegative => "O-",
});

str_enum!(SortField {
    Age => "age",
    Gender => "gender",
    BloodType => "blood_type",
});

str_enum!(SortOrder {
    Asc => "asc",
    Desc => "desc",
});

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn blood_type_round_trip() {
        for (variant, s) in [
            (BloodType::APositive, "A+"),
            (BloodType::ANegative, "A-"),
            (BloodType::BPositive, "B+"),
            (BloodType::BNegative, "B-"),
            (BloodType::AbPositive, "AB+"),
            (BloodType::AbNegative, "AB-"),
            (BloodType::OPositive, "O+"),
            (BloodType::ONegative, "O-"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(BloodType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn gender_parse_loose_ignores_case_and_padding() {
        assert_eq!(Gender::parse_loose("male"), Some(Gender::Male));
        assert_eq!(Gender::parse_loose(" FEMALE "), Some(Gender::Female));
        assert_eq!(Gender::parse_loose("other"), None);
    }

    #[test]
    fn from_str_is_exact() {
        assert!(Gender::from_str("male").is_err());
        assert!(BloodType::from_str("X+").is_err());
        assert!(SortField::from_str("name").is_err());
        assert!(SortOrder::from_str("ASC").is_err());
    }

    #[test]
    fn serializes_as_canonical_string() {
        let json = serde_json::to_string(&BloodType::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let back: Gender = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(back, Gender::Female);
    }

    #[test]
    fn parse_error_names_the_enum() {
        let err = SortField::from_str("name").unwrap_err();
        assert_eq!(err.field, "SortField");
        assert_eq!(err.value, "name");
    }

    #[test]
    fn choices_lists_every_variant() {
        assert_eq!(SortOrder::choices(), "asc, desc");
        assert_eq!(BloodType::ALL.len(), 8);
    }
}
