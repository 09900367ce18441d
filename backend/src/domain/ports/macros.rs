//! Helper macro for declaring collaborator port error enums.
//!
//! Every variant carries a single `message` describing the provider failure.
//! The macro derives `thiserror::Error`, a snake-case constructor per variant
//! accepting `impl Into<String>`, and `kind()` for structured log fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $format:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($format)]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Construct the `" $variant "` variant."]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                }
            )*

            /// Snake-case variant name for log fields.
            pub fn kind(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant { .. } => ::paste::paste!(stringify!([<$variant:snake>])),
                    )*
                }
            }

            /// Provider-supplied failure description.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } => message.as_str(), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
