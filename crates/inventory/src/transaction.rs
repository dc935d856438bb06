use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use siteledger_core::{LedgerError, LedgerResult, MaterialId, TransactionId};

/// Direction of a stock movement: `in` = received, `out` = issued/consumed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    In,
    Out,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "in",
            TransactionType::Out => "out",
        }
    }

    /// The movement's contribution to the stock level.
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            TransactionType::In => quantity,
            TransactionType::Out => -quantity,
        }
    }
}

impl core::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(TransactionType::In),
            "out" => Ok(TransactionType::Out),
            other => Err(LedgerError::invalid_input(format!(
                "type must be 'in' or 'out', got '{other}'"
            ))),
        }
    }
}

/// An immutable record of one stock movement for one material.
///
/// `id` and `date` are assigned by the store at insert time. The record
/// never changes after creation; corrections are new movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialTransaction {
    pub id: TransactionId,
    pub material_id: MaterialId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i64,
    pub date: DateTime<Utc>,
    pub reference: Option<String>,
}

/// A validated, not-yet-recorded stock movement.
///
/// Constructing a draft is the ledger's defensive validation step: a draft
/// only exists with a known direction and a positive quantity, so the
/// stores never see malformed movements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    material_id: MaterialId,
    kind: TransactionType,
    quantity: i64,
    reference: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        material_id: MaterialId,
        kind: &str,
        quantity: i64,
        reference: Option<String>,
    ) -> LedgerResult<Self> {
        let kind = kind.parse::<TransactionType>()?;
        if quantity <= 0 {
            return Err(LedgerError::invalid_input(
                "quantity must be a positive integer",
            ));
        }
        Ok(Self {
            material_id,
            kind,
            quantity,
            reference,
        })
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Stock level after applying one movement.
///
/// Negative results are permitted: an oversized `out` represents stock
/// issued against pending deliveries and is recorded as-is.
pub fn apply_movement(stock: i64, kind: TransactionType, quantity: i64) -> i64 {
    stock + kind.signed(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_directions() {
        assert_eq!("in".parse::<TransactionType>().unwrap(), TransactionType::In);
        assert_eq!("out".parse::<TransactionType>().unwrap(), TransactionType::Out);
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = "sideways".parse::<TransactionType>().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn draft_rejects_non_positive_quantity() {
        for quantity in [0, -1, -500] {
            let err = TransactionDraft::new(MaterialId::from(1), "in", quantity, None).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)), "quantity {quantity}");
        }
    }

    #[test]
    fn draft_rejects_unknown_direction() {
        let err = TransactionDraft::new(MaterialId::from(1), "sideways", 5, None).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn draft_carries_validated_fields() {
        let draft =
            TransactionDraft::new(MaterialId::from(1), "out", 50, Some("PO-123".to_string()))
                .unwrap();
        assert_eq!(draft.material_id(), MaterialId::from(1));
        assert_eq!(draft.kind(), TransactionType::Out);
        assert_eq!(draft.quantity(), 50);
        assert_eq!(draft.reference(), Some("PO-123"));
    }

    #[test]
    fn movements_apply_in_both_directions() {
        assert_eq!(apply_movement(500, TransactionType::Out, 50), 450);
        assert_eq!(apply_movement(450, TransactionType::In, 20), 470);
    }

    #[test]
    fn oversized_out_goes_negative() {
        assert_eq!(apply_movement(10, TransactionType::Out, 25), -15);
    }

    #[test]
    fn wire_shape_uses_type_key() {
        let tx = MaterialTransaction {
            id: TransactionId::from(7),
            material_id: MaterialId::from(1),
            kind: TransactionType::Out,
            quantity: 50,
            date: Utc::now(),
            reference: Some("PO-123".to_string()),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], serde_json::json!("out"));
        assert_eq!(json["materialId"], serde_json::json!(1));
        assert_eq!(json["quantity"], serde_json::json!(50));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn movement() -> impl Strategy<Value = (TransactionType, i64)> {
            (
                prop_oneof![Just(TransactionType::In), Just(TransactionType::Out)],
                1i64..10_000,
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Folding any sequence of movements over an initial stock must
            /// land exactly on initial + sum(in) - sum(out).
            #[test]
            fn stock_equals_net_sum_of_movements(
                initial in -1_000i64..1_000_000,
                movements in proptest::collection::vec(movement(), 0..64),
            ) {
                let folded = movements
                    .iter()
                    .fold(initial, |stock, (kind, quantity)| apply_movement(stock, *kind, *quantity));

                let net: i64 = movements.iter().map(|(kind, quantity)| kind.signed(*quantity)).sum();
                prop_assert_eq!(folded, initial + net);
            }

            /// Movement order never changes the final stock level.
            #[test]
            fn movements_commute(
                initial in -1_000i64..1_000_000,
                mut movements in proptest::collection::vec(movement(), 0..32),
            ) {
                let forward = movements
                    .iter()
                    .fold(initial, |stock, (kind, quantity)| apply_movement(stock, *kind, *quantity));
                movements.reverse();
                let backward = movements
                    .iter()
                    .fold(initial, |stock, (kind, quantity)| apply_movement(stock, *kind, *quantity));
                prop_assert_eq!(forward, backward);
            }
        }
    }
}
