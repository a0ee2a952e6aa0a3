//! Newtype IDs for type-safe entity references.
//!
//! Every table in the shop uses a `serial` primary key, so each ID wraps an
//! `i32`. IDs that arrive as path parameters are parsed with `FromStr`.

/// Define a type-safe ID wrapper around `i32`.
///
/// The generated type is `Copy`, serializes transparently, parses from a
/// decimal string, and (with the `postgres` feature) binds directly in sqlx
/// queries.
///
/// ```rust
/// # use juice_shop_core::define_id;
/// define_id!(CouponId);
///
/// let id: CouponId = "42".parse().unwrap();
/// assert_eq!(id.as_i32(), 42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId);
define_id!(BasketId);
define_id!(ProductId);
define_id!(BasketItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_path_segment() {
        assert_eq!("7".parse::<BasketId>().unwrap(), BasketId::new(7));
        assert_eq!("-3".parse::<BasketId>().unwrap(), BasketId::new(-3));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("undefined".parse::<BasketId>().is_err());
        assert!("1 OR 1=1".parse::<BasketId>().is_err());
        assert!("".parse::<BasketId>().is_err());
        assert!("99999999999".parse::<BasketId>().is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&UserId::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}
