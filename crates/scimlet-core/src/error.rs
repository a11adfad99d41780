//! Error classification shared by all storage backends.

/// Implemented by every [`UserStore`](crate::store::UserStore) error type.
///
/// The protocol layer never inspects backend-specific variants; it only asks
/// whether a failed write was rejected by a uniqueness or integrity
/// constraint. Such failures are the caller's fault and are reported as a
/// conflict. Everything else is an opaque server fault.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_conflict(&self) -> bool;
}
