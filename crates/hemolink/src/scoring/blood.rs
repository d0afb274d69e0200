use serde::{Deserialize, Serialize};

/// ABO group plus Rh sign. Used as the lookup key for the compatibility
/// matrix and the availability baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BloodType {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BloodType::APositive => "A_POSITIVE",
            BloodType::ANegative => "A_NEGATIVE",
            BloodType::BPositive => "B_POSITIVE",
            BloodType::BNegative => "B_NEGATIVE",
            BloodType::AbPositive => "AB_POSITIVE",
            BloodType::AbNegative => "AB_NEGATIVE",
            BloodType::OPositive => "O_POSITIVE",
            BloodType::ONegative => "O_NEGATIVE",
        }
    }

    /// Recipient types that can safely receive this donor's blood.
    ///
    /// The relation is one-directional: O_NEGATIVE donates to everyone,
    /// AB_POSITIVE only to itself.
    pub const fn compatible_recipients(self) -> &'static [BloodType] {
        use BloodType::*;
        match self {
            ONegative => &[
                ONegative, OPositive, ANegative, APositive, BNegative, BPositive, AbNegative,
                AbPositive,
            ],
            OPositive => &[OPositive, APositive, BPositive, AbPositive],
            ANegative => &[ANegative, APositive, AbNegative, AbPositive],
            APositive => &[APositive, AbPositive],
            BNegative => &[BNegative, BPositive, AbNegative, AbPositive],
            BPositive => &[BPositive, AbPositive],
            AbNegative => &[AbNegative, AbPositive],
            AbPositive => &[AbPositive],
        }
    }

    /// Membership test against the donor's recipient set.
    pub fn is_compatible(self, patient: BloodType) -> bool {
        self.compatible_recipients().contains(&patient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_self_compatible() {
        for blood_type in BloodType::ALL {
            assert!(
                blood_type.is_compatible(blood_type),
                "{} should accept its own type",
                blood_type.label()
            );
        }
    }

    #[test]
    fn o_negative_is_universal_donor() {
        for recipient in BloodType::ALL {
            assert!(BloodType::ONegative.is_compatible(recipient));
        }
    }

    #[test]
    fn ab_positive_is_universal_recipient() {
        for donor in BloodType::ALL {
            assert!(donor.is_compatible(BloodType::AbPositive));
        }
    }

    #[test]
    fn ab_positive_donates_only_to_itself() {
        assert_eq!(
            BloodType::AbPositive.compatible_recipients(),
            &[BloodType::AbPositive]
        );
    }

    #[test]
    fn matrix_is_not_symmetric() {
        assert!(BloodType::OPositive.is_compatible(BloodType::AbPositive));
        assert!(!BloodType::AbPositive.is_compatible(BloodType::OPositive));
    }

    #[test]
    fn wire_names_use_screaming_snake_case() {
        let encoded = serde_json::to_string(&BloodType::AbNegative).expect("serializes");
        assert_eq!(encoded, "\"AB_NEGATIVE\"");
        let decoded: BloodType = serde_json::from_str("\"O_POSITIVE\"").expect("deserializes");
        assert_eq!(decoded, BloodType::OPositive);
    }
}
