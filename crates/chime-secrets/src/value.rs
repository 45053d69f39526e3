// value.rs — Opaque secret value wrapper.

/// A fetched secret value.
///
/// Deliberately opaque: no `Serialize`, and `Debug` redacts. Call
/// [`SecretValue::expose`] at the single point the raw value is actually
/// needed (e.g. the webhook URL handed to the HTTP client).
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(<redacted>)")
    }
}
