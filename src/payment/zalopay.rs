//! HTTP client and signing rules for the ZaloPay v2 API.
//!
//! Every request is form-encoded and carries a lowercase hex HMAC-SHA256
//! `mac`. Creation and status queries are signed with `key1`; callbacks
//! from the gateway are signed with `key2`.

use std::time::Duration;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use super::PaymentError;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDetail, OrderStatus};

pub const SANDBOX_APP_ID: &str = "2553";
pub const DEFAULT_CREATE_ENDPOINT: &str = "https://sb-openapi.zalopay.vn/v2/create";
pub const DEFAULT_QUERY_ENDPOINT: &str = "https://sb-openapi.zalopay.vn/v2/query";

/// `app_trans_id` dates are in Vietnam time.
const GATEWAY_UTC_OFFSET_HOURS: i64 = 7;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct ZaloPayConfig {
    pub app_id: String,
    pub key1: String,
    pub key2: String,
    pub create_endpoint: String,
    pub query_endpoint: String,
    pub timeout_secs: u64,
    /// Public URL of this service, always ending in `/`. Used for the
    /// redirect and callback URLs embedded in each payment.
    pub public_base_url: String,
}

/// Form body of `POST /v2/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub app_id: String,
    pub app_trans_id: String,
    pub app_user: String,
    pub app_time: i64,
    pub item: String,
    pub embed_data: String,
    pub amount: i64,
    pub description: String,
    pub callback_url: String,
    pub bank_code: String,
    pub mac: String,
}

#[derive(Debug, Clone, Serialize)]
struct QueryStatusRequest<'a> {
    app_id: &'a str,
    app_trans_id: &'a str,
    mac: String,
}

#[derive(Debug, Serialize)]
struct GatewayItem<'a> {
    id: Uuid,
    product_id: Uuid,
    quantity: i32,
    price: &'a BigDecimal,
}

#[derive(Debug, Serialize)]
struct EmbedData {
    redirecturl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderResponse {
    pub return_code: i32,
    pub return_message: String,
    pub sub_return_code: Option<i32>,
    pub sub_return_message: Option<String>,
    pub order_url: Option<String>,
    pub zp_trans_token: Option<String>,
    pub order_token: Option<String>,
    pub qr_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryStatusResponse {
    pub return_code: i32,
    pub return_message: String,
    pub sub_return_code: Option<i32>,
    pub sub_return_message: Option<String>,
    pub is_processing: Option<bool>,
    pub amount: Option<i64>,
    pub zp_trans_id: Option<i64>,
}

/// Lowercase hex HMAC-SHA256 of `data` under `key`.
pub fn sign(key: &str, data: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    format!("{:x}", mac.finalize().into_bytes())
}

/// Constant-time comparison of `mac` against the signature of `data`.
pub fn verify(key: &str, data: &str, mac: &str) -> bool {
    sign(key, data).as_bytes().ct_eq(mac.as_bytes()).into()
}

/// `YYMMDD_<order id as 32 hex chars>`, dated in gateway local time.
pub fn app_trans_id(order_id: Uuid, at: DateTime<Utc>) -> String {
    let local = at + chrono::Duration::hours(GATEWAY_UTC_OFFSET_HOURS);
    format!("{}_{}", local.format("%y%m%d"), order_id.simple())
}

/// Recovers the order id from an `app_trans_id`.
pub fn parse_app_trans_id(app_trans_id: &str) -> Option<Uuid> {
    let (date, id) = app_trans_id.split_once('_')?;
    if date.len() != 6 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Uuid::parse_str(id).ok()
}

/// Gateway `return_code` to local order status: `1` paid, `2`/`3` failed,
/// anything else still processing.
pub fn status_for_return_code(return_code: i32) -> OrderStatus {
    match return_code {
        1 => OrderStatus::Delivering,
        2 | 3 => OrderStatus::Cancelled,
        _ => OrderStatus::Pending,
    }
}

pub struct ZaloPayClient {
    client: Client,
    config: ZaloPayConfig,
}

impl ZaloPayClient {
    /// # Errors
    ///
    /// Returns [`PaymentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: ZaloPayConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("skincare-store/0.1 (payments)")
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ZaloPayConfig {
        &self.config
    }

    /// Builds and signs the creation request for `order`.
    ///
    /// # Errors
    ///
    /// [`PaymentError::Domain`] when the amount does not fit the gateway's
    /// integer field, [`PaymentError::Encode`] if the line items cannot be
    /// serialized.
    pub fn build_create_request(
        &self,
        order: &Order,
        details: &[OrderDetail],
        now: DateTime<Utc>,
    ) -> Result<CreateOrderRequest, PaymentError> {
        let cfg = &self.config;
        let amount = order.final_amount.round(0).to_i64().ok_or_else(|| {
            DomainError::InvalidInput(format!(
                "order amount {} is out of range for the gateway",
                order.final_amount
            ))
        })?;

        let items: Vec<GatewayItem<'_>> = details
            .iter()
            .map(|d| GatewayItem {
                id: d.id,
                product_id: d.product_id,
                quantity: d.quantity,
                price: &d.price,
            })
            .collect();
        let item = serde_json::to_string(&items)?;
        let embed_data = serde_json::to_string(&EmbedData {
            redirecturl: format!("{}{}/invoice", cfg.public_base_url, order.id),
        })?;

        let app_trans_id = app_trans_id(order.id, now);
        let app_user = order.customer_id.to_string();
        let app_time = now.timestamp_millis();

        let data = format!(
            "{}|{}|{}|{}|{}|{}|{}",
            cfg.app_id, app_trans_id, app_user, amount, app_time, embed_data, item
        );
        let mac = sign(&cfg.key1, &data);

        Ok(CreateOrderRequest {
            app_id: cfg.app_id.clone(),
            app_trans_id,
            app_user,
            app_time,
            item,
            embed_data,
            amount,
            description: format!("Skincare - Payment for the order #{}", order.id),
            callback_url: format!(
                "{}api/payment/callback?orderId={}",
                cfg.public_base_url, order.id
            ),
            bank_code: String::new(),
            mac,
        })
    }

    /// Submits a signed creation request.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::Http`] on network failure or timeout.
    /// - [`PaymentError::Gateway`] on a non-2xx answer.
    /// - [`PaymentError::Deserialize`] if the body is not the expected JSON.
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, PaymentError> {
        self.post_form(
            &self.config.create_endpoint,
            request,
            format!("create(app_trans_id={})", request.app_trans_id),
        )
        .await
    }

    /// Queries the gateway for the state of `app_trans_id`.
    ///
    /// # Errors
    ///
    /// Same as [`ZaloPayClient::create_order`].
    pub async fn query_status(
        &self,
        app_trans_id: &str,
    ) -> Result<QueryStatusResponse, PaymentError> {
        let cfg = &self.config;
        let data = format!("{}|{}|{}", cfg.app_id, app_trans_id, cfg.key1);
        let request = QueryStatusRequest {
            app_id: &cfg.app_id,
            app_trans_id,
            mac: sign(&cfg.key1, &data),
        };
        self.post_form(
            &cfg.query_endpoint,
            &request,
            format!("query(app_trans_id={app_trans_id})"),
        )
        .await
    }

    /// Checks a callback `mac`, which the gateway signs with `key2`.
    pub fn verify_callback(&self, data: &str, mac: &str) -> bool {
        verify(&self.config.key2, data, mac)
    }

    async fn post_form<B, R>(&self, url: &str, form: &B, context: String) -> Result<R, PaymentError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.client.post(url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("ZaloPay {context} failed: HTTP {status}: {body}");
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| PaymentError::Deserialize { context, source })
    }
}
