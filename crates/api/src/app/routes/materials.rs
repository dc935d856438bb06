use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use siteledger_core::MaterialId;
use siteledger_inventory::{NewMaterial, TransactionDraft};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route("/transaction", post(record_transaction))
        .route("/:id/transactions", get(list_material_transactions))
}

pub async fn list_materials(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_materials().await {
        Ok(materials) => (StatusCode::OK, Json(materials)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_material(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewMaterial>,
) -> axum::response::Response {
    match services.store().create_material(body).await {
        Ok(material) => (StatusCode::CREATED, Json(material)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn record_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RecordTransactionRequest>,
) -> axum::response::Response {
    let draft = match TransactionDraft::new(
        MaterialId::from(body.material_id),
        &body.kind,
        body.quantity,
        body.reference,
    ) {
        Ok(draft) => draft,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.store().record_transaction(draft).await {
        Ok(tx) => (StatusCode::CREATED, Json(tx)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_material_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MaterialId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid material id"),
    };

    match services.store().get_material(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "material not found"),
        Err(e) => return errors::ledger_error_to_response(e),
    }

    match services.store().list_transactions(id).await {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
