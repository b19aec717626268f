//! In-memory repositories and fixtures for HTTP and payment tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

use skincare_store::domain::catalog::{
    Category, Customer, Feedback, FeedbackPatch, NewFeedback, NewSkinType, Product,
    ProductDetail, ProductQuery, SkinType, SkinTypePatch,
};
use skincare_store::domain::errors::DomainError;
use skincare_store::domain::order::{
    NewOrder, NewOrderLine, Order, OrderDetail, OrderItemDetail, OrderItems, OrderPatch,
    OrderQuery, OrderStatus, PaymentMethod,
};
use skincare_store::domain::pagination::{PageRequest, Paginated};
use skincare_store::domain::ports::{
    CatalogRepository, CustomerRepository, FeedbackRepository, OrderRepository,
    PromotionRepository,
};
use skincare_store::domain::pricing::{line_total, totals};
use skincare_store::domain::promotion::{
    DiscountType, NewPromotion, Promotion, PromotionPatch, PromotionQuery,
};
use skincare_store::payment::{Reconciler, ZaloPayClient, ZaloPayConfig};
use skincare_store::{AppState, Repositories};

pub const KEY1: &str = "test-key1";
pub const KEY2: &str = "test-key2";

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal")
}

/// Reads a decimal rendered either as a JSON string or number.
pub fn amount(v: &serde_json::Value) -> BigDecimal {
    match v {
        serde_json::Value::String(s) => dec(s),
        other => dec(&other.to_string()),
    }
}

#[derive(Default)]
struct State {
    categories: HashMap<Uuid, Category>,
    skin_types: HashMap<Uuid, SkinType>,
    products: HashMap<Uuid, Product>,
    customers: HashMap<Uuid, Customer>,
    feedbacks: HashMap<Uuid, Feedback>,
    promotions: HashMap<Uuid, Promotion>,
    orders: HashMap<Uuid, Order>,
    details: Vec<OrderDetail>,
}

/// One shared store implementing every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> Paginated<T> {
    let total = items.len() as i64;
    let data = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    Paginated::new(data, page, total)
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            orders: self.clone(),
            promotions: self.clone(),
            catalog: self.clone(),
            feedback: self.clone(),
            customers: self.clone(),
        }
    }

    pub fn add_category(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn add_skin_type(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state.lock().unwrap().skin_types.insert(
            id,
            SkinType {
                id,
                name: name.to_string(),
                description: String::new(),
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn add_product(&self, name: &str, price: &str, category_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state.lock().unwrap().products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                description: String::new(),
                price: dec(price),
                stock_quantity: 100,
                image_url: format!("https://cdn.example.com/{id}.png"),
                category_id,
                skin_type_id: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn add_customer(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.state.lock().unwrap().customers.insert(
            id,
            Customer {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", id.simple()),
                phone: None,
                address: None,
                skin_type_id: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn add_promotion(
        &self,
        code: &str,
        discount_type: DiscountType,
        value: &str,
        usage_limit: i32,
    ) -> Uuid {
        let now = Utc::now();
        let promotion = PromotionRepository::create(
            self,
            NewPromotion {
                name: format!("{code} promotion"),
                code: code.to_string(),
                description: None,
                discount_type,
                discount_value: dec(value),
                start_date: now - ChronoDuration::days(1),
                end_date: now + ChronoDuration::days(30),
                min_order_value: dec("0"),
                max_discount_amount: dec("0"),
                usage_limit,
            },
        )
        .expect("create promotion");
        promotion.id
    }

    /// Stores a one-line order for `customer_id`, optionally already sent
    /// to the gateway under `payment_ref`.
    pub fn seed_order(&self, customer_id: Uuid, payment_ref: Option<&str>) -> Uuid {
        let category = self.add_category("Serums");
        let product = self.add_product("Hyaluronic serum", "250000", category);
        let order = OrderRepository::create(
            self,
            NewOrder {
                customer_id,
                promotion_id: None,
                totals: totals(dec("250000"), dec("0"), dec("20000")),
                payment_method: PaymentMethod::Zalopay,
                shipping_address: Some("12 Le Loi, District 1".to_string()),
                lines: vec![NewOrderLine {
                    product_id: product,
                    quantity: 1,
                    price: dec("250000"),
                }],
            },
        )
        .expect("create order");
        if let Some(payment_ref) = payment_ref {
            self.set_payment_ref(order.id, payment_ref)
                .expect("set payment ref");
        }
        order.id
    }

    pub fn promotion(&self, id: Uuid) -> Promotion {
        self.state.lock().unwrap().promotions[&id].clone()
    }

    pub fn order(&self, id: Uuid) -> Order {
        self.state.lock().unwrap().orders[&id].clone()
    }

    pub fn attach_payment_ref(&self, id: Uuid, payment_ref: &str) {
        self.set_payment_ref(id, payment_ref)
            .expect("set payment ref");
    }

    pub fn set_payment_method(&self, id: Uuid, method: PaymentMethod) {
        if let Some(order) = self.state.lock().unwrap().orders.get_mut(&id) {
            order.payment_method = method;
        }
    }

    pub fn set_status(&self, id: Uuid, status: OrderStatus) {
        if let Some(order) = self.state.lock().unwrap().orders.get_mut(&id) {
            order.status = status;
        }
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut state = self.state.lock().unwrap();

        if let Some(promotion_id) = order.promotion_id {
            let promotion = state
                .promotions
                .get_mut(&promotion_id)
                .ok_or_else(|| DomainError::InvalidInput("unknown promotion".to_string()))?;
            if promotion.usage_count >= promotion.usage_limit {
                return Err(DomainError::InvalidInput(
                    "promotion usage limit reached".to_string(),
                ));
            }
            promotion.usage_count += 1;
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let created = Order {
            id,
            customer_id: order.customer_id,
            promotion_id: order.promotion_id,
            subtotal: order.totals.subtotal,
            discount_amount: order.totals.discount_amount,
            delivery_fee: order.totals.delivery_fee,
            final_amount: order.totals.final_amount,
            status: OrderStatus::Pending,
            payment_method: order.payment_method,
            payment_ref: None,
            canceled_reason: None,
            shipping_address: order.shipping_address,
            created_at: now,
            updated_at: now,
        };
        for line in order.lines {
            state.details.push(OrderDetail {
                id: Uuid::new_v4(),
                order_id: id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            });
        }
        state.orders.insert(id, created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.state.lock().unwrap().orders.get(&id).cloned())
    }

    fn find_details(&self, order_id: Uuid) -> Result<Vec<OrderDetail>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .details
            .iter()
            .filter(|d| d.order_id == order_id)
            .cloned()
            .collect())
    }

    fn find_items(&self, order_id: Uuid) -> Result<Option<OrderItems>, DomainError> {
        let state = self.state.lock().unwrap();
        let Some(order) = state.orders.get(&order_id) else {
            return Ok(None);
        };
        let order_details = state
            .details
            .iter()
            .filter(|d| d.order_id == order_id)
            .filter_map(|d| {
                let product = state.products.get(&d.product_id)?;
                let category = state.categories.get(&product.category_id)?;
                Some(OrderItemDetail {
                    order_detail_id: d.id,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    product_image_url: product.image_url.clone(),
                    product_category_id: category.id,
                    product_category_name: category.name.clone(),
                    quantity: d.quantity,
                    price: d.price.clone(),
                    total_price: line_total(&d.price, d.quantity),
                    discounted_amount: order.discount_amount.clone(),
                })
            })
            .collect();
        Ok(Some(OrderItems {
            order_id,
            order_details,
            status: order.status,
            payment_method: order.payment_method,
            total_amount: order.subtotal.clone(),
            final_amount: order.final_amount.clone(),
        }))
    }

    fn list(&self, query: &OrderQuery) -> Result<Paginated<Order>, DomainError> {
        let state = self.state.lock().unwrap();
        let name = query.customer_name.as_deref().map(str::to_lowercase);
        let mut items: Vec<Order> = state
            .orders
            .values()
            .filter(|o| query.statuses.is_empty() || query.statuses.contains(&o.status))
            .filter(|o| query.customer_id.map_or(true, |c| o.customer_id == c))
            .filter(|o| match &name {
                Some(n) => state
                    .customers
                    .get(&o.customer_id)
                    .is_some_and(|c| c.name.to_lowercase().contains(n)),
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(items, query.page))
    }

    fn update(&self, id: Uuid, patch: OrderPatch) -> Result<Option<Order>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(order) = state.orders.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(reason) = patch.canceled_reason {
            order.canceled_reason = Some(reason);
        }
        if let Some(method) = patch.payment_method {
            order.payment_method = method;
        }
        if let Some(address) = patch.shipping_address {
            order.shipping_address = Some(address);
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    fn set_payment_ref(&self, id: Uuid, payment_ref: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(DomainError::NotFound("Order"))?;
        order.payment_ref = Some(payment_ref.to_string());
        Ok(())
    }

    fn settle_payment(
        &self,
        id: Uuid,
        payment_ref: &str,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        match state.orders.get_mut(&id) {
            Some(order)
                if order.status == OrderStatus::Pending
                    && order.payment_ref.as_deref() == Some(payment_ref) =>
            {
                order.status = to;
                order.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn list_awaiting_payment(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Pending && o.payment_ref.is_some())
            .cloned()
            .collect())
    }
}

impl PromotionRepository for InMemoryStore {
    fn create(&self, promotion: NewPromotion) -> Result<Promotion, DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.promotions.values().any(|p| p.code == promotion.code) {
            return Err(DomainError::Conflict(format!(
                "promotion code '{}' already exists",
                promotion.code
            )));
        }
        let now = Utc::now();
        let created = Promotion {
            id: Uuid::new_v4(),
            name: promotion.name,
            code: promotion.code,
            description: promotion.description,
            discount_type: promotion.discount_type,
            discount_value: promotion.discount_value,
            start_date: promotion.start_date,
            end_date: promotion.end_date,
            min_order_value: promotion.min_order_value,
            max_discount_amount: promotion.max_discount_amount,
            usage_limit: promotion.usage_limit,
            usage_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.promotions.insert(created.id, created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Promotion>, DomainError> {
        Ok(self.state.lock().unwrap().promotions.get(&id).cloned())
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .promotions
            .values()
            .find(|p| p.code == code)
            .cloned())
    }

    fn list(&self, query: &PromotionQuery) -> Result<Paginated<Promotion>, DomainError> {
        let state = self.state.lock().unwrap();
        let search = query.search.as_deref().map(str::to_lowercase);
        let mut items: Vec<Promotion> = state
            .promotions
            .values()
            .filter(|p| query.is_active.map_or(true, |a| p.is_active == a))
            .filter(|p| match &search {
                Some(s) => p.name.to_lowercase().contains(s) || p.code.to_lowercase().contains(s),
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(items, query.page))
    }

    fn update(&self, id: Uuid, patch: PromotionPatch) -> Result<Option<Promotion>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(p) = state.promotions.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            p.name = v;
        }
        if let Some(v) = patch.code {
            p.code = v;
        }
        if let Some(v) = patch.description {
            p.description = Some(v);
        }
        if let Some(v) = patch.discount_type {
            p.discount_type = v;
        }
        if let Some(v) = patch.discount_value {
            p.discount_value = v;
        }
        if let Some(v) = patch.start_date {
            p.start_date = v;
        }
        if let Some(v) = patch.end_date {
            p.end_date = v;
        }
        if let Some(v) = patch.min_order_value {
            p.min_order_value = v;
        }
        if let Some(v) = patch.max_discount_amount {
            p.max_discount_amount = v;
        }
        if let Some(v) = patch.usage_limit {
            p.usage_limit = v;
        }
        if let Some(v) = patch.is_active {
            p.is_active = v;
        }
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }

    fn toggle_active(&self, id: Uuid) -> Result<Option<Promotion>, DomainError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.promotions.get_mut(&id).map(|p| {
            p.is_active = !p.is_active;
            p.clone()
        }))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.state.lock().unwrap().promotions.remove(&id).is_some())
    }
}

impl CatalogRepository for InMemoryStore {
    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.state.lock().unwrap().products.get(&id).cloned())
    }

    fn find_products(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    fn list_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<Product> = state
            .products
            .values()
            .filter(|p| query.category_id.map_or(true, |c| p.category_id == c))
            .filter(|p| query.min_price.as_ref().map_or(true, |m| &p.price >= m))
            .filter(|p| query.max_price.as_ref().map_or(true, |m| &p.price <= m))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(paginate(items, query.page))
    }

    fn product_detail(&self, id: Uuid) -> Result<Option<ProductDetail>, DomainError> {
        let state = self.state.lock().unwrap();
        let Some(product) = state.products.get(&id).cloned() else {
            return Ok(None);
        };
        Ok(Some(ProductDetail {
            feedbacks: state
                .feedbacks
                .values()
                .filter(|f| f.product_id == id)
                .cloned()
                .collect(),
            category: state.categories.get(&product.category_id).cloned(),
            skin_type: product
                .skin_type_id
                .and_then(|s| state.skin_types.get(&s).cloned()),
            related_products: Vec::new(),
            product,
        }))
    }

    fn list_skin_types(&self) -> Result<Vec<SkinType>, DomainError> {
        let mut items: Vec<SkinType> = self
            .state
            .lock()
            .unwrap()
            .skin_types
            .values()
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn find_skin_type(&self, id: Uuid) -> Result<Option<SkinType>, DomainError> {
        Ok(self.state.lock().unwrap().skin_types.get(&id).cloned())
    }

    fn create_skin_type(&self, skin_type: NewSkinType) -> Result<SkinType, DomainError> {
        let now = Utc::now();
        let created = SkinType {
            id: Uuid::new_v4(),
            name: skin_type.name,
            description: skin_type.description,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .skin_types
            .insert(created.id, created.clone());
        Ok(created)
    }

    fn update_skin_type(
        &self,
        id: Uuid,
        patch: SkinTypePatch,
    ) -> Result<Option<SkinType>, DomainError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.skin_types.get_mut(&id).map(|s| {
            if let Some(name) = patch.name {
                s.name = name;
            }
            if let Some(description) = patch.description {
                s.description = description;
            }
            s.clone()
        }))
    }

    fn delete_skin_type(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.state.lock().unwrap().skin_types.remove(&id).is_some())
    }
}

impl FeedbackRepository for InMemoryStore {
    fn list_for_product(&self, product_id: Uuid) -> Result<Vec<Feedback>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .feedbacks
            .values()
            .filter(|f| f.product_id == product_id)
            .cloned()
            .collect())
    }

    fn create(&self, feedback: NewFeedback) -> Result<Feedback, DomainError> {
        let mut state = self.state.lock().unwrap();
        if !state.products.contains_key(&feedback.product_id) {
            return Err(DomainError::InvalidInput("unknown product".to_string()));
        }
        let now = Utc::now();
        let created = Feedback {
            id: Uuid::new_v4(),
            product_id: feedback.product_id,
            customer_id: feedback.customer_id,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: now,
            updated_at: now,
        };
        state.feedbacks.insert(created.id, created.clone());
        Ok(created)
    }

    fn update(&self, id: Uuid, patch: FeedbackPatch) -> Result<Option<Feedback>, DomainError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.feedbacks.get_mut(&id).map(|f| {
            if let Some(rating) = patch.rating {
                f.rating = rating;
            }
            if let Some(comment) = patch.comment {
                f.comment = comment;
            }
            f.clone()
        }))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.state.lock().unwrap().feedbacks.remove(&id).is_some())
    }
}

impl CustomerRepository for InMemoryStore {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        Ok(self.state.lock().unwrap().customers.get(&id).cloned())
    }

    fn list(&self, page: PageRequest) -> Result<Paginated<Customer>, DomainError> {
        let mut items: Vec<Customer> = self
            .state
            .lock()
            .unwrap()
            .customers
            .values()
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(items, page))
    }
}

pub fn gateway_config(base_url: &str) -> ZaloPayConfig {
    let base = base_url.trim_end_matches('/');
    ZaloPayConfig {
        app_id: "2553".to_string(),
        key1: KEY1.to_string(),
        key2: KEY2.to_string(),
        create_endpoint: format!("{base}/v2/create"),
        query_endpoint: format!("{base}/v2/query"),
        timeout_secs: 5,
        public_base_url: "https://shop.example.com/".to_string(),
    }
}

/// Wires services over `store`, pointing the gateway at `gateway_base_url`.
pub fn build_state(
    store: &Arc<InMemoryStore>,
    gateway_base_url: &str,
    recheck_delay: Duration,
) -> (AppState, Reconciler) {
    let gateway = Arc::new(
        ZaloPayClient::new(gateway_config(gateway_base_url)).expect("client should build"),
    );
    let repos = store.repositories();
    let reconciler = Reconciler::new(Arc::clone(&gateway), Arc::clone(&repos.orders), recheck_delay, 4);
    let state = AppState::new(repos, reconciler.clone(), gateway);
    (state, reconciler)
}
