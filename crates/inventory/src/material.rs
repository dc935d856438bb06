use serde::{Deserialize, Serialize};

use siteledger_core::{LedgerError, LedgerResult, MaterialId};

/// Reorder threshold applied when inventory setup does not supply one.
pub const DEFAULT_MIN_LEVEL: i64 = 10;

/// A trackable inventory item with a current stock level.
///
/// `stock` is mutated exclusively by the ledger's `record_transaction`
/// operation; at rest it always equals the material's initial stock plus
/// the net sum of its recorded movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub stock: i64,
    pub griha_compliant: bool,
    pub min_level: i64,
}

impl Material {
    /// Reorder alert: stock has fallen below the configured threshold.
    pub fn below_min_level(&self) -> bool {
        self.stock < self.min_level
    }
}

/// Inventory-setup input: a material as submitted, before the store has
/// assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterial {
    pub name: String,
    pub category: String,
    pub unit: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub griha_compliant: bool,
    #[serde(default = "default_min_level")]
    pub min_level: i64,
}

fn default_min_level() -> i64 {
    DEFAULT_MIN_LEVEL
}

impl NewMaterial {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::invalid_input("name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::invalid_input("category cannot be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(LedgerError::invalid_input("unit cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cement() -> NewMaterial {
        NewMaterial {
            name: "Cement (GRIHA Compliant)".to_string(),
            category: "cement".to_string(),
            unit: "bags".to_string(),
            stock: 500,
            griha_compliant: true,
            min_level: DEFAULT_MIN_LEVEL,
        }
    }

    #[test]
    fn valid_material_passes_validation() {
        assert!(cement().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        for field in ["name", "category", "unit"] {
            let mut new = cement();
            match field {
                "name" => new.name = "   ".to_string(),
                "category" => new.category = String::new(),
                _ => new.unit = String::new(),
            }
            assert!(
                matches!(new.validate(), Err(LedgerError::InvalidInput(_))),
                "blank {field} should be invalid"
            );
        }
    }

    #[test]
    fn min_level_defaults_when_omitted() {
        let new: NewMaterial =
            serde_json::from_str(r#"{"name":"Steel TMT Bars","category":"steel","unit":"MT"}"#)
                .unwrap();
        assert_eq!(new.min_level, DEFAULT_MIN_LEVEL);
        assert_eq!(new.stock, 0);
        assert!(!new.griha_compliant);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let material = Material {
            id: MaterialId::from(1),
            name: "Cement (GRIHA Compliant)".to_string(),
            category: "cement".to_string(),
            unit: "bags".to_string(),
            stock: 500,
            griha_compliant: true,
            min_level: 10,
        };
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["grihaCompliant"], serde_json::json!(true));
        assert_eq!(json["minLevel"], serde_json::json!(10));
        assert_eq!(json["stock"], serde_json::json!(500));
    }

    #[test]
    fn below_min_level_flags_reorder() {
        let mut material = Material {
            id: MaterialId::from(1),
            name: "Steel TMT Bars".to_string(),
            category: "steel".to_string(),
            unit: "MT".to_string(),
            stock: 20,
            griha_compliant: false,
            min_level: 10,
        };
        assert!(!material.below_min_level());
        material.stock = 9;
        assert!(material.below_min_level());
    }
}
