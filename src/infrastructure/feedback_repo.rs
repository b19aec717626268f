use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{Feedback, FeedbackPatch, NewFeedback};
use crate::domain::errors::DomainError;
use crate::domain::ports::FeedbackRepository;
use crate::schema::feedbacks;

use super::models::{FeedbackChangeset, FeedbackRow, NewFeedbackRow};

pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FeedbackRepository for DieselFeedbackRepository {
    fn list_for_product(&self, product_id: Uuid) -> Result<Vec<Feedback>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = feedbacks::table
            .filter(feedbacks::product_id.eq(product_id))
            .order(feedbacks::created_at.desc())
            .select(FeedbackRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    fn create(&self, feedback: NewFeedback) -> Result<Feedback, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(feedbacks::table)
            .values(&NewFeedbackRow {
                id: Uuid::new_v4(),
                product_id: feedback.product_id,
                customer_id: feedback.customer_id,
                rating: feedback.rating,
                comment: feedback.comment,
            })
            .returning(FeedbackRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, id: Uuid, patch: FeedbackPatch) -> Result<Option<Feedback>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(feedbacks::table.find(id))
            .set(&FeedbackChangeset {
                rating: patch.rating,
                comment: patch.comment,
                updated_at: Utc::now(),
            })
            .returning(FeedbackRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Feedback::from))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(feedbacks::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::DieselFeedbackRepository;
    use crate::domain::catalog::{FeedbackPatch, NewFeedback};
    use crate::domain::errors::DomainError;
    use crate::domain::ports::FeedbackRepository;
    use crate::infrastructure::test_support::{
        insert_category, insert_customer, insert_product, setup_db,
    };

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn feedback_lifecycle() {
        let (_container, pool) = setup_db().await;
        let category = insert_category(&pool, "Eye care");
        let product = insert_product(&pool, "Eye Cream", "300000", category, None);
        let customer = insert_customer(&pool, "Thu Vo");
        let repo = DieselFeedbackRepository::new(pool);

        let created = repo
            .create(NewFeedback {
                product_id: product,
                customer_id: customer,
                rating: 4,
                comment: "Absorbs quickly".to_string(),
            })
            .expect("create");

        let updated = repo
            .update(
                created.id,
                FeedbackPatch {
                    rating: Some(5),
                    ..FeedbackPatch::default()
                },
            )
            .expect("update")
            .expect("exists");
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.comment, "Absorbs quickly");

        assert_eq!(repo.list_for_product(product).expect("list").len(), 1);
        assert!(repo.delete(created.id).expect("delete"));
        assert!(repo.list_for_product(product).expect("list").is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn feedback_for_unknown_product_is_invalid_input() {
        let (_container, pool) = setup_db().await;
        let customer = insert_customer(&pool, "Thu Vo");
        let repo = DieselFeedbackRepository::new(pool);

        let err = repo
            .create(NewFeedback {
                product_id: Uuid::new_v4(),
                customer_id: customer,
                rating: 3,
                comment: String::new(),
            })
            .expect_err("foreign key must be enforced");
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
