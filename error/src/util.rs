use crate::Error;

/// Compare two errors
///
/// Used for testing only
pub fn assert_error_eq<L, R>(l: L, r: R)
where
    L: Into<Error>,
    R: Into<Error>,
{
    assert_eq!(
        Into::<Error>::into(l).to_string(),
        Into::<Error>::into(r).to_string(),
    );
}

/// Defines an error struct carrying a `kind` and a dynamic cause.
///
/// The kind gains two constructors: `because` wraps any standard error as the cause, `other`
/// wraps any displayable value.
#[macro_export]
macro_rules! def_error_base_on_kind {
    ($error:ident, $error_kind:ty, $comment_error:expr, $comment_because:expr, $comment_other:expr) => {
        #[doc = $comment_error]
        #[derive(Debug, Clone)]
        pub struct $error {
            kind: $error_kind,
            inner: $crate::AnyError,
        }

        impl ::std::fmt::Display for $error {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                if self.inner.downcast_ref::<$crate::SilentError>().is_some() {
                    write!(f, "{}", self.kind)
                } else if f.alternate() {
                    write!(f, "{}: {}", self.kind, self.inner)
                } else {
                    write!(f, "{}({})", self.kind, self.inner)
                }
            }
        }

        impl ::std::error::Error for $error {
            fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                Some(self.inner.as_std_error())
            }
        }

        impl From<$error_kind> for $error {
            fn from(kind: $error_kind) -> Self {
                kind.because($crate::SilentError)
            }
        }

        impl $error_kind {
            #[doc = $comment_because]
            pub fn because<E>(self, reason: E) -> $error
            where
                E: ::std::error::Error + Send + Sync + 'static,
            {
                $error {
                    kind: self,
                    inner: reason.into(),
                }
            }

            #[doc = $comment_other]
            pub fn other<T>(self, reason: T) -> $error
            where
                T: ::std::fmt::Display + ::std::fmt::Debug + Send + Sync + 'static,
            {
                $error {
                    kind: self,
                    inner: $crate::OtherError::new(reason).into(),
                }
            }
        }

        impl $error {
            /// Returns the kind of this error.
            pub fn kind(&self) -> $error_kind {
                self.kind
            }

            /// Attempts to downcast the cause to a concrete type.
            pub fn downcast_ref<T>(&self) -> Option<&T>
            where
                T: ::std::fmt::Display + ::std::fmt::Debug + Send + Sync + 'static,
            {
                self.inner.downcast_ref::<T>()
            }

            /// The lowest level cause of this error.
            pub fn root_cause(&self) -> &(dyn ::std::error::Error + 'static) {
                self.inner.root_cause()
            }
        }
    };
    ($error:ident, $error_kind:ty, $comment_error:expr) => {
        $crate::def_error_base_on_kind!(
            $error,
            $error_kind,
            $comment_error,
            "Creates an error with the given kind and caused by `reason`.",
            "Creates an error with the given kind and an ad-hoc message as the cause."
        );
    };
}

/// Implements `From<$source>` for `$target` by wrapping the source under `$kind`.
#[macro_export]
macro_rules! impl_error_conversion_with_kind {
    ($source:ty, $kind:expr, $target:ty) => {
        impl ::std::convert::From<$source> for $target {
            fn from(error: $source) -> Self {
                $kind.because(error)
            }
        }
    };
}
