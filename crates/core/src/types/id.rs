//! Newtype wrappers for Shopify global IDs.
//!
//! Shopify identifies every resource with an opaque global ID of the form
//! `gid://shopify/<Type>/<N>`. Use the `define_gid!` macro to create type-safe
//! wrappers that prevent accidentally mixing IDs from different resources.

/// Return the trailing segment of a global ID (everything after the last `/`).
///
/// Strings without a `/` are returned unchanged, so malformed IDs pass through
/// rather than failing.
///
/// ```rust
/// # use shopfront_core::numeric_id;
/// assert_eq!(numeric_id("gid://shopify/ProductVariant/4412"), "4412");
/// assert_eq!(numeric_id("4412"), "4412");
/// ```
#[must_use]
pub fn numeric_id(gid: &str) -> &str {
    gid.rsplit_once('/').map_or(gid, |(_, tail)| tail)
}

/// Macro to define a type-safe global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Accessors: `new()`, `as_str()`, `numeric_id()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use shopfront_core::define_gid;
/// define_gid!(LocationGid);
///
/// let id = LocationGid::new("gid://shopify/Location/7");
/// assert_eq!(id.numeric_id(), "7");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw global ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw global ID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get the trailing numeric segment of the ID.
            #[must_use]
            pub fn numeric_id(&self) -> &str {
                $crate::numeric_id(&self.0)
            }

            /// Consume the wrapper and return the raw string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(VariantGid);
define_gid!(CartGid);
