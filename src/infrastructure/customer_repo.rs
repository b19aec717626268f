use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::Customer;
use crate::domain::errors::DomainError;
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::ports::CustomerRepository;
use crate::schema::customers;

use super::models::CustomerRow;

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for DieselCustomerRepository {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .find(id)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Customer::from))
    }

    fn list(&self, page: PageRequest) -> Result<Paginated<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = customers::table.count().get_result(conn)?;

            let rows = customers::table
                .order((customers::created_at.desc(), customers::id.asc()))
                .limit(page.limit)
                .offset(page.offset())
                .select(CustomerRow::as_select())
                .load(conn)?;

            Ok(Paginated::new(
                rows.into_iter().map(Customer::from).collect(),
                page,
                total,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::DieselCustomerRepository;
    use crate::domain::pagination::PageRequest;
    use crate::domain::ports::CustomerRepository;
    use crate::infrastructure::test_support::{insert_customer, setup_db};

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn list_and_find_customers() {
        let (_container, pool) = setup_db().await;
        let first = insert_customer(&pool, "Lan Nguyen");
        for name in ["Minh Tran", "Hoa Le"] {
            insert_customer(&pool, name);
        }
        let repo = DieselCustomerRepository::new(pool);

        let page = repo.list(PageRequest::new(Some(2), Some(2))).expect("list");
        assert_eq!(page.total_docs, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 1);

        let found = repo.find_by_id(first).expect("find").expect("exists");
        assert_eq!(found.name, "Lan Nguyen");
        assert!(repo.find_by_id(Uuid::new_v4()).expect("find").is_none());
    }
}
