use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::reconciler::Reconciler;
use super::zalopay::{parse_app_trans_id, CreateOrderResponse, ZaloPayClient};
use super::{blocking, PaymentError};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, PaymentMethod};
use crate::domain::ports::OrderRepository;

const GATEWAY_SUCCESS: i32 = 1;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentStarted {
    pub order_id: Uuid,
    pub app_trans_id: String,
    pub gateway: CreateOrderResponse,
}

/// Body the gateway POSTs to the callback URL.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CallbackRequest {
    pub data: String,
    pub mac: String,
    #[serde(rename = "type", default)]
    pub kind: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CallbackData {
    app_trans_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CallbackResponse {
    pub return_code: i32,
    pub return_message: String,
}

impl CallbackResponse {
    fn new(return_code: i32, return_message: impl Into<String>) -> Self {
        Self {
            return_code,
            return_message: return_message.into(),
        }
    }
}

#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<ZaloPayClient>,
    orders: Arc<dyn OrderRepository>,
    reconciler: Reconciler,
}

impl PaymentService {
    pub fn new(
        gateway: Arc<ZaloPayClient>,
        orders: Arc<dyn OrderRepository>,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            gateway,
            orders,
            reconciler,
        }
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Submits a pending ZaloPay order to the gateway. On acceptance the
    /// `app_trans_id` is stored on the order and a delayed recheck is
    /// scheduled.
    pub async fn start_payment(&self, order_id: Uuid) -> Result<PaymentStarted, PaymentError> {
        let orders = Arc::clone(&self.orders);
        let (order, details) = blocking(move || {
            let order = orders
                .find_by_id(order_id)?
                .ok_or(DomainError::NotFound("Order"))?;
            let details = orders.find_details(order_id)?;
            Ok((order, details))
        })
        .await?;

        if order.status != OrderStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "order {order_id} is {}; only pending orders can be paid",
                order.status
            ))
            .into());
        }
        if order.payment_method != PaymentMethod::Zalopay {
            return Err(DomainError::Conflict(format!(
                "order {order_id} is paid by {}, not zalopay",
                order.payment_method.as_str()
            ))
            .into());
        }
        if details.is_empty() {
            return Err(DomainError::InvalidInput(format!("order {order_id} has no items")).into());
        }

        let request = self
            .gateway
            .build_create_request(&order, &details, Utc::now())?;
        let response = self.gateway.create_order(&request).await?;

        if response.return_code == GATEWAY_SUCCESS {
            let orders = Arc::clone(&self.orders);
            let payment_ref = request.app_trans_id.clone();
            blocking(move || orders.set_payment_ref(order_id, &payment_ref)).await?;
            self.reconciler
                .schedule_recheck(order_id, request.app_trans_id.clone());
        } else {
            warn!(
                "ZaloPay rejected order {order_id}: return_code={} {}",
                response.return_code, response.return_message
            );
        }

        Ok(PaymentStarted {
            order_id,
            app_trans_id: request.app_trans_id,
            gateway: response,
        })
    }

    /// Verifies and applies a gateway callback. Always yields a protocol
    /// response: `1` success, `-1` bad mac, `0` so the gateway retries.
    pub async fn handle_callback(&self, callback: CallbackRequest) -> CallbackResponse {
        if !self.gateway.verify_callback(&callback.data, &callback.mac) {
            warn!("rejected ZaloPay callback with invalid mac");
            return CallbackResponse::new(-1, "mac not equal");
        }

        match self.apply_callback(&callback.data).await {
            Ok(()) => CallbackResponse::new(1, "success"),
            Err(e) => {
                error!("failed to process ZaloPay callback: {e}");
                CallbackResponse::new(0, e.to_string())
            }
        }
    }

    async fn apply_callback(&self, data: &str) -> Result<(), PaymentError> {
        let data: CallbackData =
            serde_json::from_str(data).map_err(|source| PaymentError::Deserialize {
                context: "callback data".to_string(),
                source,
            })?;
        let order_id = parse_app_trans_id(&data.app_trans_id).ok_or_else(|| {
            DomainError::InvalidInput(format!("malformed app_trans_id '{}'", data.app_trans_id))
        })?;

        let orders = Arc::clone(&self.orders);
        let app_trans_id = data.app_trans_id;
        let updated = blocking(move || {
            orders.settle_payment(order_id, &app_trans_id, OrderStatus::Delivering)
        })
        .await?;

        if updated {
            info!("order {order_id} paid via callback; status updated to delivering");
        } else {
            info!(
                "callback for order {order_id} ignored; order is not pending on that transaction"
            );
        }
        Ok(())
    }
}
