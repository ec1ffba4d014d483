//! Generic list / get / create / update / delete over every plain resource.
//!
//! A resource type describes where it lives and how it is filtered by
//! implementing [`Listable`]; writable ones add [`Writable`]. The
//! implementations live in [`super::registry`].

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow, PgConnection, Pool, Postgres};
use validator::Validate;

use super::{
    changeset::{insert_sql, update_sql, Changeset},
    transitions,
    query::{FilterSet, ListQuery},
    workflow::{self, Workflow},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ResourceKind, ResourceStatus},
        pagination::{Page, PageRequest},
    },
};

/// A table or view that can be listed and fetched by id
pub trait Listable: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    /// Table or view selected from
    const SOURCE: &'static str;
    /// Label used in "`<Resource>` not found"
    const NAME: &'static str;
    const ORDER_BY: &'static str;
    /// Rows with `deleted_at` set are invisible
    const SOFT_DELETE: bool = false;

    type Query: DeserializeOwned + Send + Sync + 'static;

    fn filters(query: &Self::Query) -> FilterSet;
}

/// Rows that must not exist for a delete to proceed. `sql` is a
/// `SELECT EXISTS(...)` taking the id as `$1`.
#[derive(Debug, Clone, Copy)]
pub struct DeleteGuard {
    pub sql: &'static str,
    pub message: &'static str,
}

/// A table accepting inserts, allow-listed updates and deletes
pub trait Writable: Listable {
    type Create: DeserializeOwned + Validate + Changeset + Send + Sync + 'static;
    type Update: DeserializeOwned + Validate + Changeset + Send + Sync + 'static;

    /// Mutations restricted to administrators
    const ADMIN_ONLY: bool = false;

    /// Carries a check-out status; an `In Use` row cannot be deleted
    const TRACKABLE: bool = false;

    const DELETE_GUARDS: &'static [DeleteGuard] = &[];

    /// Trackable resource a new row points at without a foreign key; it
    /// must exist before the insert.
    fn referenced_resource(_data: &Self::Create) -> Option<(ResourceKind, i32)> {
        None
    }
}

#[derive(Clone)]
pub struct ResourcesRepository {
    pool: Pool<Postgres>,
}

impl ResourcesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list<R: Listable>(&self, query: &R::Query, page: PageRequest) -> AppResult<Page<R>> {
        ListQuery::new(R::SOURCE, R::filters(query), R::ORDER_BY, page)
            .fetch_page(&self.pool)
            .await
    }

    pub async fn get<R: Listable>(&self, id: i32) -> AppResult<R> {
        let sql = select_by_id_sql(R::SOURCE, R::SOFT_DELETE);
        sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(R::NAME))
    }

    pub async fn create<R: Writable>(&self, data: &R::Create, actor: i32) -> AppResult<R> {
        if let Some((kind, id)) = R::referenced_resource(data) {
            let mut conn = self.pool.acquire().await?;
            transitions::ensure_exists(&mut conn, kind, id).await?;
        }

        let changes = data.changes();
        let columns: Vec<&str> = changes.iter().map(|(column, _)| *column).collect();
        let sql = insert_sql(R::SOURCE, &columns);

        let mut builder = sqlx::query_as::<_, R>(&sql);
        for (_, value) in changes {
            builder = builder.bind(value);
        }
        let row = builder.bind(actor).fetch_one(&self.pool).await?;

        tracing::info!(resource = R::NAME, "created");
        Ok(row)
    }

    /// Applies only the supplied columns. An empty changeset is rejected
    /// before touching the database.
    pub async fn update<R: Writable>(&self, id: i32, data: &R::Update, actor: i32) -> AppResult<R> {
        let changes = data.changes();
        if changes.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        let columns: Vec<&str> = changes.iter().map(|(column, _)| *column).collect();
        let sql = update_sql(R::SOURCE, &columns, R::SOFT_DELETE);

        let mut builder = sqlx::query_as::<_, R>(&sql);
        for (_, value) in changes {
            builder = builder.bind(value);
        }
        builder
            .bind(actor)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(R::NAME))
    }

    pub async fn delete<R: Writable>(&self, id: i32) -> AppResult<()> {
        workflow::execute(
            &self.pool,
            DeleteResource {
                table: R::SOURCE,
                name: R::NAME,
                id,
                soft_delete: R::SOFT_DELETE,
                trackable: R::TRACKABLE,
                guards: R::DELETE_GUARDS,
            },
        )
        .await
    }
}

pub(crate) fn not_found(name: &str) -> AppError {
    AppError::NotFound(format!("{} not found", name))
}

fn select_by_id_sql(source: &str, soft_delete: bool) -> String {
    if soft_delete {
        format!("SELECT * FROM {} WHERE id = $1 AND deleted_at IS NULL", source)
    } else {
        format!("SELECT * FROM {} WHERE id = $1", source)
    }
}

fn select_status_sql(table: &str, soft_delete: bool) -> String {
    if soft_delete {
        format!("SELECT status FROM {} WHERE id = $1 AND deleted_at IS NULL", table)
    } else {
        format!("SELECT status FROM {} WHERE id = $1", table)
    }
}

/// Trackable rows are only removed while not `In Use` (bound as `$2`)
fn delete_sql(table: &str, soft_delete: bool, trackable: bool) -> String {
    let status = if trackable { " AND status <> $2" } else { "" };
    if soft_delete {
        format!(
            "UPDATE {} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL{}",
            table, status
        )
    } else {
        format!("DELETE FROM {} WHERE id = $1{}", table, status)
    }
}

/// Evaluates the delete guards and removes the row in one transaction
struct DeleteResource {
    table: &'static str,
    name: &'static str,
    id: i32,
    soft_delete: bool,
    trackable: bool,
    guards: &'static [DeleteGuard],
}

#[async_trait]
impl Workflow for DeleteResource {
    type Output = ();
    const NAME: &'static str = "delete_resource";

    async fn run(self, conn: &mut PgConnection) -> AppResult<()> {
        for guard in self.guards {
            let blocked: bool = sqlx::query_scalar(guard.sql)
                .bind(self.id)
                .fetch_one(&mut *conn)
                .await?;
            if blocked {
                return Err(AppError::BadRequest(guard.message.to_string()));
            }
        }

        let sql = delete_sql(self.table, self.soft_delete, self.trackable);
        let mut query = sqlx::query(&sql).bind(self.id);
        if self.trackable {
            query = query.bind(ResourceStatus::InUse);
        }
        let result = query.execute(&mut *conn).await?;

        if result.rows_affected() == 0 {
            if self.trackable {
                let status: Option<ResourceStatus> =
                    sqlx::query_scalar(&select_status_sql(self.table, self.soft_delete))
                        .bind(self.id)
                        .fetch_optional(&mut *conn)
                        .await?;
                if status.is_some() {
                    return Err(AppError::BadRequest(format!(
                        "{} is checked out; check it in before deleting",
                        self.name
                    )));
                }
            }
            return Err(not_found(self.name));
        }

        tracing::info!(resource = self.name, id = self.id, "deleted");
        Ok(())
    }
}
