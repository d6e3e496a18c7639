//! Value object trait: equality by value, not identity.

/// Marker trait for immutable domain values compared by their attributes.
///
/// A `(module, action)` permission key is the canonical example here: two
/// keys with the same module and action denote the same capability, no
/// matter which catalog row they came from.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct PermissionKey {
///     module: String,
///     action: String,
/// }
///
/// impl ValueObject for PermissionKey {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
