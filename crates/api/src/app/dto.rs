use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/materials/transaction`.
///
/// `type` stays a free string here; `TransactionDraft::new` is the
/// validation step that turns it into a movement direction or rejects it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionRequest {
    pub material_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    pub reference: Option<String>,
}
