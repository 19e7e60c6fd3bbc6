//! PostgreSQL-backed `RoleRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageRequest, SortOrder};

use crate::domain::ports::{QueryResult, RoleRepository, RoleRepositoryError};
use crate::domain::{Role, RoleId, RoleTitle};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRoleRow, RoleRow, RoleTitleUpdate};
use super::pool::DbPool;
use super::schema::roles;

/// Diesel-backed implementation of the role repository port.
#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_role(row: RoleRow) -> Result<Role, RoleRepositoryError> {
    let invalid = |error: crate::domain::RoleValidationError| {
        RoleRepositoryError::query(format!("stored role is invalid: {error}"))
    };
    Ok(Role::new(
        RoleId::new(row.id).map_err(invalid)?,
        RoleTitle::new(row.title).map_err(invalid)?,
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn create(&self, title: &RoleTitle) -> Result<Role, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: RoleRow = diesel::insert_into(roles::table)
            .values(&NewRoleRow {
                title: title.as_ref(),
            })
            .returning(RoleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_role(row)
    }

    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RoleRow> = roles::table
            .find(id.get())
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_role).transpose()
    }

    async fn list(&self, page: &PageRequest) -> Result<QueryResult<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = roles::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let query = roles::table.select(RoleRow::as_select()).into_boxed();
        let query = match page.order() {
            SortOrder::Asc => query.order((roles::created_at.asc(), roles::id.asc())),
            SortOrder::Desc => query.order((roles::created_at.desc(), roles::id.desc())),
        };
        let rows: Vec<RoleRow> = query
            .limit(i64::from(page.limit()))
            .offset(i64::from(page.offset()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(QueryResult {
            rows: rows.into_iter().map(row_to_role).collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update(
        &self,
        id: RoleId,
        title: &RoleTitle,
    ) -> Result<Option<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RoleRow> = diesel::update(roles::table.find(id.get()))
            .set(&RoleTitleUpdate {
                title: title.as_ref(),
                updated_at: Utc::now(),
            })
            .returning(RoleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_role).transpose()
    }

    async fn delete(&self, id: RoleId) -> Result<bool, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Users reference roles with `ON DELETE RESTRICT`; the violation
        // surfaces as `ForeignKeyViolation`.
        let deleted = diesel::delete(roles::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
