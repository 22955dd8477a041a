//! # Request Handlers
//!
//! Axum request handlers for the checkout API. Cart and pipeline handlers
//! operate on the caller's session slot, keyed by the credential subject;
//! an unusable credential on these JSON endpoints is a 401, never a panic.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use store_core::{
    CartItem, CheckoutError, PaymentMethod, PipelineStep, Price, ShippingAddress,
};
use store_gateway::{ConfirmOutcome, IntentState, PaymentOrchestrator};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("Invalid or missing credential", 401)),
    )
}

/// Snapshot of the caller's cart
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Price,
    pub item_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub checking_out: bool,
}

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
}

/// Payment-method selection request
#[derive(Debug, Deserialize)]
pub struct SetPaymentMethodRequest {
    pub method: PaymentMethod,
}

/// Checkout-in-progress marker request
#[derive(Debug, Deserialize)]
pub struct SetCheckingOutRequest {
    pub checking_out: bool,
}

/// One step's navigability in the pipeline view
#[derive(Debug, Serialize)]
pub struct StepView {
    pub step: PipelineStep,
    pub route: &'static str,
    pub navigable: bool,
}

/// Pipeline progress snapshot
#[derive(Debug, Serialize)]
pub struct PipelineView {
    pub highest_reached: PipelineStep,
    pub progress: usize,
    pub steps: Vec<StepView>,
}

/// Pipeline navigation request
#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub step: PipelineStep,
}

/// Intent-creation request (`POST /api/orders/create-payment-intent`)
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub amount: i64,
}

/// Intent-creation response
#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Payment-confirmation request
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    /// Gateway instrument handle (pm_...); raw instrument data never
    /// reaches this server
    pub instrument_ref: String,
}

/// Payment-confirmation response
#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    pub status: IntentState,
    pub order_complete: bool,
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolve the caller's session subject from the bearer credential.
///
/// The same fail-closed decode as the gate; these JSON endpoints answer
/// 401 instead of redirecting.
fn require_subject(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    let claims = state.gate.verify_token(token).ok_or_else(unauthorized)?;
    claims.sub.ok_or_else(unauthorized)
}

fn cart_view(ledger: &store_core::CartLedger) -> CartView {
    CartView {
        items: ledger.items.clone(),
        total: ledger.total(),
        item_count: ledger.item_count(),
        shipping_address: ledger.shipping_address.clone(),
        payment_method: ledger.payment_method,
        checking_out: ledger.checking_out,
    }
}

fn pipeline_view(
    pipeline: &store_core::PipelineController,
    ledger: &store_core::CartLedger,
) -> PipelineView {
    PipelineView {
        highest_reached: pipeline.highest_reached(),
        progress: pipeline.progress(),
        steps: PipelineStep::ALL
            .iter()
            .map(|&step| StepView {
                step,
                route: step.route(),
                navigable: pipeline.can_navigate(step, ledger),
            })
            .collect(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storegate",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<_> = state.catalog.active_products().collect();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.get(&product_id).ok_or_else(|| {
        checkout_error_to_response(CheckoutError::ProductNotFound {
            product_id: product_id.clone(),
        })
    })?;

    Ok(Json(product.clone()))
}

/// Current cart snapshot
pub async fn get_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| cart_view(&s.ledger))))
}

/// Add a product to the cart (repeat adds increment quantity)
#[instrument(skip(state, headers))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;

    let product = state
        .catalog
        .get(&request.product_id)
        .ok_or_else(|| {
            checkout_error_to_response(CheckoutError::ProductNotFound {
                product_id: request.product_id.clone(),
            })
        })?
        .clone();

    if !product.active {
        return Err(checkout_error_to_response(CheckoutError::InvalidRequest(
            format!("Product is not available: {}", request.product_id),
        )));
    }

    let view = state.with_session(&subject, |s| {
        s.ledger.add_item(&product);
        cart_view(&s.ledger)
    });

    info!("Added {} to cart for {}", request.product_id, subject);
    Ok(Json(view))
}

/// Increment an item's quantity (no-op when absent)
pub async fn increment_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        s.ledger.increment(&product_id);
        cart_view(&s.ledger)
    })))
}

/// Decrement an item's quantity, floored at 1
pub async fn decrement_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        s.ledger.decrement(&product_id);
        cart_view(&s.ledger)
    })))
}

/// Remove an item regardless of quantity
pub async fn remove_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        s.ledger.remove(&product_id);
        cart_view(&s.ledger)
    })))
}

/// Set the shipping address
pub async fn set_shipping_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(address): Json<ShippingAddress>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        s.ledger.set_shipping_address(address);
        cart_view(&s.ledger)
    })))
}

/// Select the payment method
pub async fn set_payment_method(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SetPaymentMethodRequest>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        s.ledger.set_payment_method(request.method);
        cart_view(&s.ledger)
    })))
}

/// Mark whether a checkout is in progress
pub async fn set_checking_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SetCheckingOutRequest>,
) -> Result<Json<CartView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        s.ledger.set_checking_out(request.checking_out);
        cart_view(&s.ledger)
    })))
}

/// Pipeline progress and step navigability
pub async fn get_pipeline(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PipelineView>, ApiError> {
    let subject = require_subject(&state, &headers)?;
    Ok(Json(state.with_session(&subject, |s| {
        pipeline_view(&s.pipeline, &s.ledger)
    })))
}

/// Navigate to a checkout step.
///
/// A refused navigation is a 409 carrying the step the user remains on,
/// not an error page.
#[instrument(skip(state, headers))]
pub async fn navigate_pipeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<PipelineView>, ApiError> {
    let subject = require_subject(&state, &headers)?;

    state.with_session(&subject, |s| {
        if s.pipeline.navigate(request.step, &s.ledger) {
            Ok(Json(pipeline_view(&s.pipeline, &s.ledger)))
        } else {
            Err(checkout_error_to_response(CheckoutError::PipelineBlocked {
                step: s.pipeline.highest_reached().to_string(),
            }))
        }
    })
}

/// Create a payment intent for the cart total.
///
/// `POST /api/orders/create-payment-intent`, body `{"amount": ...}`; the
/// posted amount must match the ledger total, which is authoritative.
#[instrument(skip(state, headers, request))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    let subject = require_subject(&state, &headers)?;

    // Validate against the session without holding the lock over the
    // gateway call.
    let total = state.with_session(&subject, |s| {
        if !s.pipeline.can_navigate(PipelineStep::Checkout, &s.ledger) {
            return Err(checkout_error_to_response(CheckoutError::PipelineBlocked {
                step: s.pipeline.highest_reached().to_string(),
            }));
        }
        if let Some(orchestrator) = &s.orchestrator {
            if orchestrator.state() == IntentState::Confirming {
                return Err(checkout_error_to_response(
                    CheckoutError::SubmissionInFlight {
                        intent_id: orchestrator.intent().id.clone(),
                    },
                ));
            }
        }
        Ok(s.ledger.total())
    })?;

    if request.amount != total.amount {
        return Err(checkout_error_to_response(CheckoutError::InvalidRequest(
            format!(
                "Amount mismatch: requested {}, cart total {}",
                request.amount, total.amount
            ),
        )));
    }

    let intent = state.gateway.create_intent(&total).await.map_err(|e| {
        error!("Intent creation failed: {}", e);
        checkout_error_to_response(e)
    })?;

    let client_secret = intent.client_secret.clone();
    state.with_session(&subject, |s| {
        s.orchestrator = Some(PaymentOrchestrator::new(intent));
    });

    Ok(Json(CreateIntentResponse { client_secret }))
}

/// Confirm the session's payment intent.
///
/// Success completes the pipeline and resets the cart exactly once; a
/// gateway failure is surfaced inline and leaves the user at the payment
/// step with a fresh intent required.
#[instrument(skip(state, headers, request))]
pub async fn confirm_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, ApiError> {
    let subject = require_subject(&state, &headers)?;

    let client_secret = state.with_session(&subject, |s| {
        let orchestrator = s.orchestrator.as_mut().ok_or_else(|| {
            checkout_error_to_response(CheckoutError::InvalidRequest(
                "No payment intent for this session".to_string(),
            ))
        })?;
        orchestrator.begin_submit().map_err(checkout_error_to_response)
    })?;

    // The session lock is not held across the confirmation call; the
    // orchestrator's in-flight flag guards against a racing resubmit.
    let outcome = state
        .gateway
        .confirm_intent(&client_secret, &request.instrument_ref)
        .await;

    let result = state.with_session(&subject, |s| {
        let orchestrator = s.orchestrator.as_mut().ok_or_else(|| {
            // Session was reset while the call was outstanding; the stale
            // response is discarded rather than applied.
            checkout_error_to_response(CheckoutError::InvalidRequest(
                "Session was reset during confirmation".to_string(),
            ))
        })?;

        let result = orchestrator.record_outcome(&outcome);
        if result.just_succeeded {
            s.pipeline.complete(&mut s.ledger);
            s.orchestrator = None;
        }
        Ok::<_, ApiError>(result)
    })?;

    match outcome {
        Err(e) => {
            error!("Payment confirmation failed: {}", e);
            Err(checkout_error_to_response(e))
        }
        Ok(ConfirmOutcome::Succeeded) | Ok(ConfirmOutcome::RequiresAction { .. }) => {
            if result.just_succeeded {
                info!("Order complete for {}", subject);
            }
            Ok(Json(ConfirmPaymentResponse {
                status: result.state,
                order_complete: result.just_succeeded,
            }))
        }
    }
}

/// Sign out: drop the session slot entirely (cart included)
pub async fn signout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let subject = require_subject(&state, &headers)?;
    state.drop_session(&subject);
    info!("Signed out {}", subject);
    Ok(StatusCode::NO_CONTENT)
}

/// Canonical admin dashboard (reached only through the gate)
pub async fn admin_dashboard() -> impl IntoResponse {
    Json(serde_json::json!({ "dashboard": "admin" }))
}

/// Canonical seller dashboard (reached only through the gate)
pub async fn seller_dashboard() -> impl IntoResponse {
    Json(serde_json::json!({ "dashboard": "seller" }))
}
