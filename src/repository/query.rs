//! Filtered list query builder.
//!
//! Every list endpoint describes its filters declaratively with a
//! [`FilterSet`]; [`ListQuery`] turns that into a `SELECT` and a matching
//! `COUNT(*)` that share one `WHERE` clause and one parameter list, so the
//! reported total always counts exactly the rows the predicate selects.

use sqlx::{postgres::PgRow, FromRow, PgPool};

use super::sql::{SqlValue, ToSqlValue};
use crate::{
    error::AppResult,
    models::pagination::{Page, PageRequest, Pagination},
};

/// Predicate template of one filter
#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    /// `column = $n`
    Equals(&'static str),
    /// `(c1 ILIKE $n OR c2 ILIKE $n ...)`
    Contains(&'static [&'static str]),
    /// `column <= $n`
    AtMost(&'static str),
    /// `column >= $n`
    AtLeast(&'static str),
    /// `column <= CURRENT_DATE + $n::int`
    DueWithinDays(&'static str),
    /// `left <= right`, no parameter
    ColumnAtMost(&'static str, &'static str),
    /// Literal condition, no parameter
    Raw(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
struct Filter {
    predicate: Predicate,
    value: Option<SqlValue>,
}

/// Ordered list of optional filter criteria combined with `AND`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_value(mut self, predicate: Predicate, value: Option<SqlValue>) -> Self {
        if value.is_some() {
            self.filters.push(Filter { predicate, value });
        }
        self
    }

    fn without_value(mut self, predicate: Predicate, active: bool) -> Self {
        if active {
            self.filters.push(Filter {
                predicate,
                value: None,
            });
        }
        self
    }

    pub fn equals(self, column: &'static str, value: impl ToSqlValue) -> Self {
        self.with_value(Predicate::Equals(column), value.to_sql_value())
    }

    /// Case-insensitive substring match over one or more columns. Blank
    /// terms are ignored.
    pub fn contains(self, columns: &'static [&'static str], term: Option<&str>) -> Self {
        let value = term
            .map(str::trim)
            .filter(|t| !t.is_empty() && !columns.is_empty())
            .map(|t| SqlValue::Text(like_pattern(t)));
        self.with_value(Predicate::Contains(columns), value)
    }

    pub fn at_most(self, column: &'static str, value: impl ToSqlValue) -> Self {
        self.with_value(Predicate::AtMost(column), value.to_sql_value())
    }

    pub fn at_least(self, column: &'static str, value: impl ToSqlValue) -> Self {
        self.with_value(Predicate::AtLeast(column), value.to_sql_value())
    }

    /// Date column falling on or before `today + days`
    pub fn due_within_days(self, column: &'static str, days: Option<i32>) -> Self {
        self.with_value(Predicate::DueWithinDays(column), days.map(SqlValue::Int))
    }

    /// Compares two columns of the same row, e.g. stock against reorder level
    pub fn column_at_most(self, left: &'static str, right: &'static str, active: bool) -> Self {
        self.without_value(Predicate::ColumnAtMost(left, right), active)
    }

    /// Unconditional base condition such as `deleted_at IS NULL`
    pub fn condition(self, sql: &'static str) -> Self {
        self.without_value(Predicate::Raw(sql), true)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Renders the active conditions with placeholders starting at
    /// `first_index`. Returns the conditions (not yet joined) and the values
    /// in bind order.
    fn render(&self, first_index: usize) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::with_capacity(self.filters.len());
        let mut params = Vec::new();
        let mut idx = first_index;

        for filter in &self.filters {
            let placeholder = format!("${}", idx);
            let condition = match &filter.predicate {
                Predicate::Equals(column) => format!("{} = {}", column, placeholder),
                Predicate::Contains(columns) => {
                    let alternatives: Vec<String> = columns
                        .iter()
                        .map(|column| format!("{} ILIKE {}", column, placeholder))
                        .collect();
                    format!("({})", alternatives.join(" OR "))
                }
                Predicate::AtMost(column) => format!("{} <= {}", column, placeholder),
                Predicate::AtLeast(column) => format!("{} >= {}", column, placeholder),
                Predicate::DueWithinDays(column) => {
                    format!("{} <= CURRENT_DATE + {}::int", column, placeholder)
                }
                Predicate::ColumnAtMost(left, right) => format!("{} <= {}", left, right),
                Predicate::Raw(sql) => sql.to_string(),
            };
            conditions.push(condition);

            if let Some(value) = &filter.value {
                params.push(value.clone());
                idx += 1;
            }
        }

        (conditions, params)
    }

    /// ` WHERE a AND b`, or an empty string when no filter is active
    pub fn where_clause(&self, first_index: usize) -> (String, Vec<SqlValue>) {
        let (conditions, params) = self.render(first_index);
        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// Escapes LIKE metacharacters and wraps the term in `%...%`
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Paired list/count SQL produced by [`ListQuery::build`]
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub select_sql: String,
    pub count_sql: String,
    /// Filter values; the select additionally binds `LIMIT` and `OFFSET`
    pub params: Vec<SqlValue>,
}

/// A paginated, filtered `SELECT` over one table or view
#[derive(Debug, Clone)]
pub struct ListQuery<'a> {
    source: &'a str,
    filters: FilterSet,
    order_by: &'a str,
    page: PageRequest,
}

impl<'a> ListQuery<'a> {
    /// `source` and `order_by` are trusted identifiers, never user input.
    pub fn new(source: &'a str, filters: FilterSet, order_by: &'a str, page: PageRequest) -> Self {
        Self {
            source,
            filters,
            order_by,
            page,
        }
    }

    pub fn build(&self) -> BuiltQuery {
        let (where_clause, params) = self.filters.where_clause(1);
        let limit_idx = params.len() + 1;

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", self.source, where_clause);
        let select_sql = format!(
            "SELECT * FROM {}{} ORDER BY {} LIMIT ${} OFFSET ${}",
            self.source,
            where_clause,
            self.order_by,
            limit_idx,
            limit_idx + 1
        );

        BuiltQuery {
            select_sql,
            count_sql,
            params,
        }
    }

    /// Runs the count then the page query
    pub async fn fetch_page<T>(&self, pool: &PgPool) -> AppResult<Page<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let built = self.build();

        let mut count_builder = sqlx::query_scalar::<_, i64>(&built.count_sql);
        for param in &built.params {
            count_builder = count_builder.bind(param.clone());
        }
        let total = count_builder.fetch_one(pool).await?;

        let mut select_builder = sqlx::query_as::<_, T>(&built.select_sql);
        for param in &built.params {
            select_builder = select_builder.bind(param.clone());
        }
        let rows = select_builder
            .bind(self.page.limit)
            .bind(self.page.offset())
            .fetch_all(pool)
            .await?;

        tracing::debug!(source = self.source, total, returned = rows.len(), "list query");

        Ok(Page {
            rows,
            pagination: Pagination::new(self.page, total),
        })
    }
}
