//! Generates adapter error enums whose variants each carry a message.

/// Declare an error enum with one `message: String` field per variant and a
/// snake-case constructor per variant accepting `impl Into<String>`.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { message: String } => $text:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($text)]
                $variant {
                    /// Detail reported by the adapter.
                    message: String,
                },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum SampleStoreError {
            Connection { message: String } => "store unreachable: {message}",
            UniqueViolation { message: String } => "duplicate: {message}",
        }
    }

    #[rstest]
    fn constructors_follow_variant_names() {
        assert_eq!(
            SampleStoreError::unique_violation("users_email_key"),
            SampleStoreError::UniqueViolation {
                message: "users_email_key".to_owned()
            }
        );
    }

    #[rstest]
    fn messages_interpolate_the_detail() {
        let err = SampleStoreError::connection(String::from("refused"));
        assert_eq!(err.to_string(), "store unreachable: refused");
    }
}
