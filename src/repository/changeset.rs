//! Allow-listed inserts and partial updates.
//!
//! A request body type lists the columns it may touch through the
//! [`changeset!`] macro. Unknown JSON keys never reach this layer (serde drops
//! them), and absent fields produce no assignment.

use super::sql::SqlValue;

/// Column/value pairs for every supplied field, in declaration order
pub trait Changeset {
    fn changes(&self) -> Vec<(&'static str, SqlValue)>;
}

/// Implements [`Changeset`] for a body struct whose field names are the
/// column names.
macro_rules! changeset {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::repository::changeset::Changeset for $ty {
            fn changes(&self) -> Vec<(&'static str, $crate::repository::sql::SqlValue)> {
                use $crate::repository::sql::ToSqlValue;
                let mut changes = Vec::new();
                $(
                    if let Some(value) = self.$field.to_sql_value() {
                        changes.push((stringify!($field), value));
                    }
                )+
                changes
            }
        }
    };
}
pub(crate) use changeset;

/// `INSERT ... RETURNING *`; the actor id is bound last and fills both audit
/// columns.
pub fn insert_sql(table: &str, columns: &[&str]) -> String {
    let mut names: Vec<&str> = columns.to_vec();
    names.push("created_by");
    names.push("updated_by");

    let mut placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
    let actor_idx = columns.len() + 1;
    placeholders.push(format!("${}", actor_idx));
    placeholders.push(format!("${}", actor_idx));

    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table,
        names.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE ... RETURNING *`; binds are the column values, then the actor id,
/// then the row id.
pub fn update_sql(table: &str, columns: &[&str], soft_delete: bool) -> String {
    let mut sets: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    let actor_idx = columns.len() + 1;
    sets.push("updated_at = NOW()".to_string());
    sets.push(format!("updated_by = ${}", actor_idx));

    let mut sql = format!(
        "UPDATE {} SET {} WHERE id = ${}",
        table,
        sets.join(", "),
        actor_idx + 1
    );
    if soft_delete {
        sql.push_str(" AND deleted_at IS NULL");
    }
    sql.push_str(" RETURNING *");
    sql
}
