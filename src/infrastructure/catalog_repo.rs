use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{
    Feedback, NewSkinType, Product, ProductDetail, ProductQuery, ProductSortField, SkinType,
    SkinTypePatch,
};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Paginated, SortOrder};
use crate::domain::ports::CatalogRepository;
use crate::schema::{categories, feedbacks, products, skin_types};

use super::like_pattern;
use super::models::{
    CategoryRow, FeedbackRow, NewSkinTypeRow, ProductRow, SkinTypeChangeset, SkinTypeRow,
};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(query: &ProductQuery) -> products::BoxedQuery<'static, Pg> {
    let mut q = products::table.into_boxed();
    if let Some(category_id) = query.category_id {
        q = q.filter(products::category_id.eq(category_id));
    }
    if let Some(skin_type_id) = query.skin_type_id {
        q = q.filter(products::skin_type_id.eq(skin_type_id));
    }
    if let Some(min) = query.min_price.clone() {
        q = q.filter(products::price.ge(min));
    }
    if let Some(max) = query.max_price.clone() {
        q = q.filter(products::price.le(max));
    }
    if let Some(name) = query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        q = q.filter(products::name.ilike(like_pattern(name)));
    }
    q
}

impl CatalogRepository for DieselCatalogRepository {
    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn find_products(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::id.eq_any(ids.to_vec()))
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(query).count().get_result(conn)?;

            let q = filtered(query);
            let q = match (query.sort.field, query.sort.order) {
                (ProductSortField::CreatedAt, SortOrder::Asc) => q.order(products::created_at.asc()),
                (ProductSortField::CreatedAt, SortOrder::Desc) => {
                    q.order(products::created_at.desc())
                }
                (ProductSortField::Name, SortOrder::Asc) => q.order(products::name.asc()),
                (ProductSortField::Name, SortOrder::Desc) => q.order(products::name.desc()),
                (ProductSortField::Price, SortOrder::Asc) => q.order(products::price.asc()),
                (ProductSortField::Price, SortOrder::Desc) => q.order(products::price.desc()),
            };

            let rows = q
                .then_order_by(products::id.asc())
                .limit(query.page.limit)
                .offset(query.page.offset())
                .select(ProductRow::as_select())
                .load(conn)?;

            Ok(Paginated::new(
                rows.into_iter().map(Product::from).collect(),
                query.page,
                total,
            ))
        })
    }

    fn product_detail(&self, id: Uuid) -> Result<Option<ProductDetail>, DomainError> {
        let mut conn = self.pool.get()?;

        let product = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(product) = product else {
            return Ok(None);
        };

        let feedbacks = feedbacks::table
            .filter(feedbacks::product_id.eq(product.id))
            .order(feedbacks::created_at.desc())
            .select(FeedbackRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(Feedback::from)
            .collect();

        let category = categories::table
            .find(product.category_id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Into::into);

        let (skin_type, related_products) = match product.skin_type_id {
            Some(skin_type_id) => {
                let skin_type = skin_types::table
                    .find(skin_type_id)
                    .select(SkinTypeRow::as_select())
                    .first(&mut conn)
                    .optional()?
                    .map(Into::into);
                let related = products::table
                    .filter(products::skin_type_id.eq(skin_type_id))
                    .filter(products::id.ne(product.id))
                    .order(products::created_at.desc())
                    .select(ProductRow::as_select())
                    .load(&mut conn)?
                    .into_iter()
                    .map(Product::from)
                    .collect();
                (skin_type, related)
            }
            None => (None, Vec::new()),
        };

        Ok(Some(ProductDetail {
            product: product.into(),
            feedbacks,
            category,
            skin_type,
            related_products,
        }))
    }

    fn list_skin_types(&self) -> Result<Vec<SkinType>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = skin_types::table
            .order(skin_types::name.asc())
            .select(SkinTypeRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(SkinType::from).collect())
    }

    fn find_skin_type(&self, id: Uuid) -> Result<Option<SkinType>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = skin_types::table
            .find(id)
            .select(SkinTypeRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(SkinType::from))
    }

    fn create_skin_type(&self, skin_type: NewSkinType) -> Result<SkinType, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(skin_types::table)
            .values(&NewSkinTypeRow {
                id: Uuid::new_v4(),
                name: skin_type.name,
                description: skin_type.description,
            })
            .returning(SkinTypeRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update_skin_type(
        &self,
        id: Uuid,
        patch: SkinTypePatch,
    ) -> Result<Option<SkinType>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(skin_types::table.find(id))
            .set(&SkinTypeChangeset {
                name: patch.name,
                description: patch.description,
                updated_at: Utc::now(),
            })
            .returning(SkinTypeRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(SkinType::from))
    }

    fn delete_skin_type(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(skin_types::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
