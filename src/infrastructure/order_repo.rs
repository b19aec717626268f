use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, Order, OrderDetail, OrderItemDetail, OrderItems, OrderPatch, OrderQuery,
    OrderSortField, OrderStatus,
};
use crate::domain::pagination::{Paginated, Sort, SortOrder};
use crate::domain::ports::OrderRepository;
use crate::domain::pricing::line_total;
use crate::schema::{categories, customers, order_details, orders, products, promotions};

use super::like_pattern;
use super::models::{
    CategoryRow, NewOrderDetailRow, NewOrderRow, OrderChangeset, OrderDetailRow, OrderRow,
    ProductRow,
};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(query: &OrderQuery, customer_ids: Option<Vec<Uuid>>) -> orders::BoxedQuery<'static, Pg> {
    let mut q = orders::table.into_boxed();
    if !query.statuses.is_empty() {
        let statuses: Vec<String> = query
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        q = q.filter(orders::status.eq_any(statuses));
    }
    if let Some(customer_id) = query.customer_id {
        q = q.filter(orders::customer_id.eq(customer_id));
    }
    if let Some(ids) = customer_ids {
        q = q.filter(orders::customer_id.eq_any(ids));
    }
    q
}

fn sorted(
    q: orders::BoxedQuery<'static, Pg>,
    sort: Sort<OrderSortField>,
) -> orders::BoxedQuery<'static, Pg> {
    match (sort.field, sort.order) {
        (OrderSortField::CreatedAt, SortOrder::Asc) => q.order(orders::created_at.asc()),
        (OrderSortField::CreatedAt, SortOrder::Desc) => q.order(orders::created_at.desc()),
        (OrderSortField::UpdatedAt, SortOrder::Asc) => q.order(orders::updated_at.asc()),
        (OrderSortField::UpdatedAt, SortOrder::Desc) => q.order(orders::updated_at.desc()),
        (OrderSortField::FinalAmount, SortOrder::Asc) => q.order(orders::final_amount.asc()),
        (OrderSortField::FinalAmount, SortOrder::Desc) => q.order(orders::final_amount.desc()),
        (OrderSortField::Status, SortOrder::Asc) => q.order(orders::status.asc()),
        (OrderSortField::Status, SortOrder::Desc) => q.order(orders::status.desc()),
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Claim one use of the promotion; the row filter keeps
            //    usage_count <= usage_limit under concurrent checkouts.
            if let Some(promotion_id) = order.promotion_id {
                let claimed = diesel::update(
                    promotions::table
                        .filter(promotions::id.eq(promotion_id))
                        .filter(promotions::usage_count.lt(promotions::usage_limit)),
                )
                .set((
                    promotions::usage_count.eq(promotions::usage_count + 1),
                    promotions::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
                if claimed == 0 {
                    return Err(DomainError::InvalidInput(
                        "promotion usage limit reached".to_string(),
                    ));
                }
            }

            // 2. Insert the order
            let order_id = Uuid::new_v4();
            let row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_id: order.customer_id,
                    promotion_id: order.promotion_id,
                    subtotal: order.totals.subtotal.clone(),
                    discount_amount: order.totals.discount_amount.clone(),
                    delivery_fee: order.totals.delivery_fee.clone(),
                    final_amount: order.totals.final_amount.clone(),
                    status: OrderStatus::Pending.as_str().to_string(),
                    payment_method: order.payment_method.as_str().to_string(),
                    shipping_address: order.shipping_address.clone(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 3. Insert order details
            let details: Vec<NewOrderDetailRow> = order
                .lines
                .iter()
                .map(|l| NewOrderDetailRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.price.clone(),
                })
                .collect();
            diesel::insert_into(order_details::table)
                .values(&details)
                .execute(conn)?;

            row.into_domain()
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(OrderRow::into_domain)
            .transpose()
    }

    fn find_details(&self, order_id: Uuid) -> Result<Vec<OrderDetail>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_details::table
            .filter(order_details::order_id.eq(order_id))
            .order(order_details::created_at.asc())
            .select(OrderDetailRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(OrderDetail::from).collect())
    }

    fn find_items(&self, order_id: Uuid) -> Result<Option<OrderItems>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(order_id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };
        let order = order.into_domain()?;

        let rows: Vec<(OrderDetailRow, ProductRow, CategoryRow)> = order_details::table
            .inner_join(products::table.inner_join(categories::table))
            .filter(order_details::order_id.eq(order_id))
            .order(order_details::created_at.asc())
            .select((
                OrderDetailRow::as_select(),
                ProductRow::as_select(),
                CategoryRow::as_select(),
            ))
            .load(&mut conn)?;

        let order_details = rows
            .into_iter()
            .map(|(detail, product, category)| OrderItemDetail {
                order_detail_id: detail.id,
                product_id: product.id,
                product_name: product.name,
                product_image_url: product.image_url,
                product_category_id: category.id,
                product_category_name: category.name,
                quantity: detail.quantity,
                total_price: line_total(&detail.price, detail.quantity),
                price: detail.price,
                discounted_amount: order.discount_amount.clone(),
            })
            .collect();

        Ok(Some(OrderItems {
            order_id: order.id,
            order_details,
            status: order.status,
            payment_method: order.payment_method,
            total_amount: order.subtotal,
            final_amount: order.final_amount,
        }))
    }

    fn list(&self, query: &OrderQuery) -> Result<Paginated<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let customer_ids = match query.customer_name.as_deref() {
                Some(name) if !name.trim().is_empty() => Some(
                    customers::table
                        .filter(customers::name.ilike(like_pattern(name.trim())))
                        .select(customers::id)
                        .load::<Uuid>(conn)?,
                ),
                _ => None,
            };

            let total: i64 = filtered(query, customer_ids.clone())
                .count()
                .get_result(conn)?;

            let rows = sorted(filtered(query, customer_ids), query.sort)
                .then_order_by(orders::id.asc())
                .limit(query.page.limit)
                .offset(query.page.offset())
                .select(OrderRow::as_select())
                .load(conn)?;

            let items = rows
                .into_iter()
                .map(OrderRow::into_domain)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Paginated::new(items, query.page, total))
        })
    }

    fn update(&self, id: Uuid, patch: OrderPatch) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let changeset = OrderChangeset {
            status: patch.status.map(|s| s.as_str().to_string()),
            canceled_reason: patch.canceled_reason,
            payment_method: patch.payment_method.map(|m| m.as_str().to_string()),
            shipping_address: patch.shipping_address,
            updated_at: Utc::now(),
        };

        diesel::update(orders::table.find(id))
            .set(&changeset)
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(OrderRow::into_domain)
            .transpose()
    }

    fn set_payment_ref(&self, id: Uuid, payment_ref: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.find(id))
            .set((
                orders::payment_ref.eq(payment_ref),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::NotFound("Order"));
        }
        Ok(())
    }

    fn settle_payment(
        &self,
        id: Uuid,
        payment_ref: &str,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::status.eq(OrderStatus::Pending.as_str()))
                .filter(orders::payment_ref.eq(payment_ref)),
        )
        .set((
            orders::status.eq(to.as_str()),
            orders::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn list_awaiting_payment(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .filter(orders::payment_ref.is_not_null())
            .order(orders::created_at.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(OrderRow::into_domain)
            .collect()
    }
}
