use crate::error::CoreError;

/// Hashes and verifies user passwords. Implemented outside the core.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, raw: &str) -> Result<String, CoreError>;

    fn verify(&self, raw: &str, hash: &str) -> bool;
}

/// Reversible stand-in for tests. Never use outside tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHasher;

#[cfg(any(test, feature = "test-utils"))]
impl CredentialHasher for PlainHasher {
    fn hash(&self, raw: &str) -> Result<String, CoreError> {
        Ok(format!("plain:{raw}"))
    }

    fn verify(&self, raw: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(raw)
    }
}
