//! Macro generating port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::super::{BookingRepositoryError, CommentRepositoryError, UserPersistenceError};
    use crate::domain::{BookingId, UserId};

    #[rstest]
    fn string_fields_accept_borrowed_text() {
        let err = CommentRepositoryError::query("relation missing");
        assert_eq!(
            err.to_string(),
            "comment repository query failed: relation missing"
        );
    }

    #[rstest]
    fn identifier_fields_keep_their_type() {
        let err = BookingRepositoryError::not_found(BookingId::new(7));
        assert_eq!(err, BookingRepositoryError::NotFound { id: BookingId::new(7) });
        assert_eq!(err.to_string(), "booking 7 not found");
    }

    #[rstest]
    #[case(UserPersistenceError::duplicate_email("ada@example.com"), "ada@example.com")]
    #[case(UserPersistenceError::not_found(UserId::new(3)), "3")]
    fn messages_mention_the_offending_value(
        #[case] err: UserPersistenceError,
        #[case] fragment: &str,
    ) {
        assert!(err.to_string().contains(fragment));
    }
}
