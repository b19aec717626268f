use chrono::Utc;
use diesel::dsl::not;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Paginated, SortOrder};
use crate::domain::ports::PromotionRepository;
use crate::domain::promotion::{
    NewPromotion, Promotion, PromotionPatch, PromotionQuery, PromotionSortField,
};
use crate::schema::promotions;

use super::like_pattern;
use super::models::{NewPromotionRow, PromotionChangeset, PromotionRow};

pub struct DieselPromotionRepository {
    pool: DbPool,
}

impl DieselPromotionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(query: &PromotionQuery) -> promotions::BoxedQuery<'static, Pg> {
    let mut q = promotions::table.into_boxed();
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        q = q.filter(
            promotions::name
                .ilike(pattern.clone())
                .or(promotions::code.ilike(pattern)),
        );
    }
    if let Some(active) = query.is_active {
        q = q.filter(promotions::is_active.eq(active));
    }
    q
}

impl PromotionRepository for DieselPromotionRepository {
    fn create(&self, promotion: NewPromotion) -> Result<Promotion, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(promotions::table)
            .values(&NewPromotionRow {
                id: Uuid::new_v4(),
                name: promotion.name,
                code: promotion.code,
                description: promotion.description,
                discount_type: promotion.discount_type.as_str().to_string(),
                discount_value: promotion.discount_value,
                start_date: promotion.start_date,
                end_date: promotion.end_date,
                min_order_value: promotion.min_order_value,
                max_discount_amount: promotion.max_discount_amount,
                usage_limit: promotion.usage_limit,
                is_active: true,
            })
            .returning(PromotionRow::as_returning())
            .get_result(&mut conn)?;
        row.into_domain()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Promotion>, DomainError> {
        let mut conn = self.pool.get()?;

        promotions::table
            .find(id)
            .select(PromotionRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(PromotionRow::into_domain)
            .transpose()
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError> {
        let mut conn = self.pool.get()?;

        promotions::table
            .filter(promotions::code.eq(code))
            .select(PromotionRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(PromotionRow::into_domain)
            .transpose()
    }

    fn list(&self, query: &PromotionQuery) -> Result<Paginated<Promotion>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(query).count().get_result(conn)?;

            let q = filtered(query);
            let q = match (query.sort.field, query.sort.order) {
                (PromotionSortField::CreatedAt, SortOrder::Asc) => {
                    q.order(promotions::created_at.asc())
                }
                (PromotionSortField::CreatedAt, SortOrder::Desc) => {
                    q.order(promotions::created_at.desc())
                }
                (PromotionSortField::StartDate, SortOrder::Asc) => {
                    q.order(promotions::start_date.asc())
                }
                (PromotionSortField::StartDate, SortOrder::Desc) => {
                    q.order(promotions::start_date.desc())
                }
                (PromotionSortField::EndDate, SortOrder::Asc) => q.order(promotions::end_date.asc()),
                (PromotionSortField::EndDate, SortOrder::Desc) => {
                    q.order(promotions::end_date.desc())
                }
                (PromotionSortField::Name, SortOrder::Asc) => q.order(promotions::name.asc()),
                (PromotionSortField::Name, SortOrder::Desc) => q.order(promotions::name.desc()),
            };

            let rows = q
                .then_order_by(promotions::id.asc())
                .limit(query.page.limit)
                .offset(query.page.offset())
                .select(PromotionRow::as_select())
                .load(conn)?;

            let data = rows
                .into_iter()
                .map(PromotionRow::into_domain)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Paginated::new(data, query.page, total))
        })
    }

    fn update(&self, id: Uuid, patch: PromotionPatch) -> Result<Option<Promotion>, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(promotions::table.find(id))
            .set(&PromotionChangeset {
                name: patch.name,
                code: patch.code,
                description: patch.description,
                discount_type: patch.discount_type.map(|t| t.as_str().to_string()),
                discount_value: patch.discount_value,
                start_date: patch.start_date,
                end_date: patch.end_date,
                min_order_value: patch.min_order_value,
                max_discount_amount: patch.max_discount_amount,
                usage_limit: patch.usage_limit,
                is_active: patch.is_active,
                updated_at: Utc::now(),
            })
            .returning(PromotionRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(PromotionRow::into_domain)
            .transpose()
    }

    fn toggle_active(&self, id: Uuid) -> Result<Option<Promotion>, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(promotions::table.find(id))
            .set((
                promotions::is_active.eq(not(promotions::is_active)),
                promotions::updated_at.eq(Utc::now()),
            ))
            .returning(PromotionRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(PromotionRow::into_domain)
            .transpose()
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(promotions::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
