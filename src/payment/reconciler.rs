use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{error, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;
use utoipa::ToSchema;
use uuid::Uuid;

use super::zalopay::{status_for_return_code, ZaloPayClient};
use super::{blocking, PaymentError};
use crate::domain::errors::DomainError;
use crate::domain::order::OrderStatus;
use crate::domain::ports::OrderRepository;

/// Outcome of reconciling one order against the gateway.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconcileResult {
    pub order_id: Uuid,
    pub app_trans_id: String,
    pub return_code: i32,
    pub return_message: String,
    /// Status implied by the gateway's answer.
    pub gateway_status: OrderStatus,
    /// Status stored on the order after reconciliation.
    pub status: OrderStatus,
    pub updated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepSummary {
    pub checked: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Syncs local order status with the gateway.
///
/// Status writes are compare-and-set from `pending` on the order's current
/// `payment_ref`, so racing rechecks, sweeps and callbacks cannot overwrite
/// each other, and a result for a superseded transaction is discarded.
#[derive(Clone)]
pub struct Reconciler {
    gateway: Arc<ZaloPayClient>,
    orders: Arc<dyn OrderRepository>,
    recheck_delay: Duration,
    concurrency: usize,
}

impl Reconciler {
    pub fn new(
        gateway: Arc<ZaloPayClient>,
        orders: Arc<dyn OrderRepository>,
        recheck_delay: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            gateway,
            orders,
            recheck_delay,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn reconcile_order(
        &self,
        order_id: Uuid,
        app_trans_id: &str,
    ) -> Result<ReconcileResult, PaymentError> {
        let response = self.gateway.query_status(app_trans_id).await?;
        info!(
            "gateway status for order {order_id} ({app_trans_id}): return_code={} {}",
            response.return_code, response.return_message
        );

        let gateway_status = status_for_return_code(response.return_code);
        let orders = Arc::clone(&self.orders);
        let payment_ref = app_trans_id.to_string();
        let (updated, status) = blocking(move || {
            let updated = gateway_status != OrderStatus::Pending
                && orders.settle_payment(order_id, &payment_ref, gateway_status)?;
            let order = orders
                .find_by_id(order_id)?
                .ok_or(DomainError::NotFound("Order"))?;
            Ok((updated, order.status))
        })
        .await?;

        if updated {
            info!("order {order_id} status updated to {gateway_status}");
        } else if gateway_status != OrderStatus::Pending {
            warn!(
                "order {order_id} is {status} and no longer awaiting {app_trans_id}; \
                 gateway result {gateway_status} discarded"
            );
        }

        Ok(ReconcileResult {
            order_id,
            app_trans_id: app_trans_id.to_string(),
            return_code: response.return_code,
            return_message: response.return_message,
            gateway_status,
            status,
            updated,
        })
    }

    /// Reconciles an order using its stored `payment_ref`.
    pub async fn reconcile_by_id(&self, order_id: Uuid) -> Result<ReconcileResult, PaymentError> {
        let orders = Arc::clone(&self.orders);
        let order = blocking(move || {
            orders
                .find_by_id(order_id)?
                .ok_or(DomainError::NotFound("Order"))
        })
        .await?;

        let app_trans_id = order.payment_ref.ok_or_else(|| {
            DomainError::InvalidInput(format!(
                "order {order_id} has not been submitted to the payment gateway"
            ))
        })?;
        self.reconcile_order(order_id, &app_trans_id).await
    }

    /// One-shot recheck after the configured delay. The timer lives in this
    /// process only; the sweep picks up anything lost on restart.
    pub fn schedule_recheck(&self, order_id: Uuid, app_trans_id: String) -> JoinHandle<()> {
        let this = self.clone();
        info!(
            "scheduled status check for order {order_id} ({app_trans_id}) in {}s",
            self.recheck_delay.as_secs()
        );
        tokio::spawn(async move {
            tokio::time::sleep(this.recheck_delay).await;
            info!("checking status for order {order_id} ({app_trans_id})");
            if let Err(e) = this.reconcile_order(order_id, &app_trans_id).await {
                error!("status check for order {order_id} failed: {e}");
            }
        })
    }

    /// Re-queries every pending order that was sent to the gateway.
    pub async fn reconcile_pending(&self) -> Result<SweepSummary, PaymentError> {
        let orders = Arc::clone(&self.orders);
        let pending = blocking(move || orders.list_awaiting_payment()).await?;

        let targets: Vec<(Uuid, String)> = pending
            .into_iter()
            .filter_map(|o| o.payment_ref.map(|r| (o.id, r)))
            .collect();
        let mut summary = SweepSummary {
            checked: targets.len(),
            ..SweepSummary::default()
        };
        if targets.is_empty() {
            info!("no pending orders awaiting payment");
            return Ok(summary);
        }

        let results: Vec<Result<ReconcileResult, PaymentError>> = stream::iter(targets)
            .map(|(order_id, app_trans_id)| async move {
                let result = self.reconcile_order(order_id, &app_trans_id).await;
                if let Err(e) = &result {
                    error!("status check for order {order_id} failed: {e}");
                }
                result
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for result in results {
            match result {
                Ok(r) if r.updated => summary.updated += 1,
                Ok(_) => {}
                Err(_) => summary.failed += 1,
            }
        }
        info!(
            "pending order sweep: checked={} updated={} failed={}",
            summary.checked, summary.updated, summary.failed
        );
        Ok(summary)
    }
}
