// ============================================================================
// Content digest
// ============================================================================

/// Maps arbitrary text to a short stable identifier.
///
/// Used to deduplicate handler identities and to mint synthetic element
/// identifiers when an element has none. Any collision-resistant-enough
/// string digest satisfies the contract; the algorithm itself is not
/// load-bearing.
pub trait ContentDigest {
    /// Pure function of `text`; same input, same output, across calls.
    fn digest(&self, text: &str) -> String;
}

/// Default digest: SHA-1 over the text, hex-rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Digest;

impl ContentDigest for Sha1Digest {
    fn digest(&self, text: &str) -> String {
        use sha1::{Digest, Sha1};

        let mut hasher = Sha1::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
