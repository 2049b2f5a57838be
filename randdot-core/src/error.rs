//! Error types for the randdot core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced while sampling, rendering, or persisting a graph.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// The requested counts or options cannot describe a valid graph.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// Human-readable description of the rejected parameter.
        reason: String,
    },
    /// The adjacency matrix for the requested vertex count could not be
    /// allocated.
    #[error("cannot allocate an adjacency matrix for {vertices} vertices")]
    ResourceExhausted {
        /// Vertex count whose square could not be allocated.
        vertices: usize,
    },
    /// The output artifact could not be created, written, or closed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Destination that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The requested counts or options cannot describe a valid graph.
        InvalidParameters => InvalidParameters { .. } => "RANDDOT_INVALID_PARAMETERS",
        /// The adjacency matrix could not be allocated.
        ResourceExhausted => ResourceExhausted { .. } => "RANDDOT_RESOURCE_EXHAUSTED",
        /// The output artifact could not be created, written, or closed.
        IoFailure => Io { .. } => "RANDDOT_IO_FAILURE",
    }
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
