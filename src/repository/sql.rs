//! Dynamically typed bind values.
//!
//! Filters and changesets are assembled at runtime, so their values travel as
//! [`SqlValue`] and are bound positionally. Each variant reports its own
//! Postgres type through `Encode::produces`, so a `DATE` stays a `DATE` on the
//! wire even though the Rust type is the same enum.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{
    encode::IsNull,
    postgres::{PgArgumentBuffer, PgTypeInfo},
    Encode, Postgres, Type,
};

use crate::models::enums::{
    BorrowStatus, EquipmentKind, ResourceKind, ResourceStatus, TransitionAction,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Bool(bool),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Type<Postgres> for SqlValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}

impl Encode<'_, Postgres> for SqlValue {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        match self {
            SqlValue::Text(v) => <String as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::Int(v) => <i32 as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::BigInt(v) => <i64 as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::Bool(v) => <bool as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::Decimal(v) => <Decimal as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::Date(v) => <NaiveDate as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::Timestamp(v) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlValue::Json(v) => <serde_json::Value as Encode<Postgres>>::encode_by_ref(v, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlValue::Text(_) => <String as Type<Postgres>>::type_info(),
            SqlValue::Int(_) => <i32 as Type<Postgres>>::type_info(),
            SqlValue::BigInt(_) => <i64 as Type<Postgres>>::type_info(),
            SqlValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            SqlValue::Decimal(_) => <Decimal as Type<Postgres>>::type_info(),
            SqlValue::Date(_) => <NaiveDate as Type<Postgres>>::type_info(),
            SqlValue::Timestamp(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
            SqlValue::Json(_) => <serde_json::Value as Type<Postgres>>::type_info(),
        })
    }
}

/// Conversion into an optional bind value; `None` means "not supplied".
pub trait ToSqlValue {
    fn to_sql_value(&self) -> Option<SqlValue>;
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> Option<SqlValue> {
        self.as_ref().and_then(ToSqlValue::to_sql_value)
    }
}

impl<T: ToSqlValue + ?Sized> ToSqlValue for &T {
    fn to_sql_value(&self) -> Option<SqlValue> {
        (**self).to_sql_value()
    }
}

impl ToSqlValue for str {
    fn to_sql_value(&self) -> Option<SqlValue> {
        Some(SqlValue::Text(self.to_string()))
    }
}

macro_rules! to_sql_value {
    ($($ty:ty => |$v:ident| $conv:expr),+ $(,)?) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(&self) -> Option<SqlValue> {
                    let $v = self;
                    Some($conv)
                }
            }
        )+
    };
}

to_sql_value! {
    String => |v| SqlValue::Text(v.clone()),
    i32 => |v| SqlValue::Int(*v),
    i64 => |v| SqlValue::BigInt(*v),
    bool => |v| SqlValue::Bool(*v),
    Decimal => |v| SqlValue::Decimal(*v),
    NaiveDate => |v| SqlValue::Date(*v),
    DateTime<Utc> => |v| SqlValue::Timestamp(*v),
    serde_json::Value => |v| SqlValue::Json(v.clone()),
    ResourceStatus => |v| SqlValue::Text(v.as_str().to_string()),
    ResourceKind => |v| SqlValue::Text(v.as_str().to_string()),
    EquipmentKind => |v| SqlValue::Text(v.as_str().to_string()),
    TransitionAction => |v| SqlValue::Text(v.as_str().to_string()),
    BorrowStatus => |v| SqlValue::Text(v.as_str().to_string()),
}
