//! The macro subsystem's external collaborators.
//!
//! `.include`/`.includes` need to fetch bytes from somewhere outside the
//! in-memory document, and `.includes` additionally needs to verify a
//! detached signature. Both concerns are host-supplied traits rather than
//! baked-in networking/crypto code, matching the collaborator split in the
//! external interface list.

/// Resolves an include location (a path or URL) to its raw bytes.
pub trait IncludeFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, String>;
}

/// Verifies a detached signature against the configured set of trusted
/// public keys.
pub trait SignatureVerifier {
    fn verify(&self, data: &[u8], signature: &[u8], pubkeys: &[Vec<u8>]) -> bool;
}

/// The default fetcher: loads `/`- and `.`-prefixed locations straight off
/// the filesystem. Anything else looks like a URL, which this port leaves
/// unimplemented rather than pulling in an HTTP client.
#[derive(Default)]
pub struct FsIncludeFetcher;

impl IncludeFetcher for FsIncludeFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, String> {
        if location.starts_with('/') || location.starts_with('.') || location.starts_with("~/") {
            std::fs::read(location).map_err(|e| e.to_string())
        } else {
            Err(format!(
                "'{location}' looks like a URL; no URL fetcher is configured"
            ))
        }
    }
}

/// Refuses every signature. Installed implicitly by leaving the verifier
/// unset: `.includes` fails closed rather than silently skipping
/// verification.
#[derive(Default)]
pub struct NullSignatureVerifier;

impl SignatureVerifier for NullSignatureVerifier {
    fn verify(&self, _data: &[u8], _signature: &[u8], _pubkeys: &[Vec<u8>]) -> bool {
        false
    }
}

/// The parsed form of a macro's argument: quoted string,
/// `{...}`-delimited raw body, or bare atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MacroArg {
    String(Vec<u8>),
    Raw(Vec<u8>),
    Bare(Vec<u8>),
}

impl MacroArg {
    /// The argument's bytes regardless of which form it took. `.include`
    /// and custom macros that expect a plain value both want this.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MacroArg::String(b) | MacroArg::Raw(b) | MacroArg::Bare(b) => b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_fetcher_rejects_url_like_locations() {
        let fetcher = FsIncludeFetcher;
        assert!(fetcher.fetch("https://example.com/x.conf").is_err());
    }

    #[test]
    fn null_verifier_always_refuses() {
        let verifier = NullSignatureVerifier;
        assert!(!verifier.verify(b"data", b"sig", &[]));
    }

    #[test]
    fn macro_arg_as_bytes_unwraps_each_form() {
        assert_eq!(MacroArg::String(b"a".to_vec()).as_bytes(), b"a");
        assert_eq!(MacroArg::Raw(b"b".to_vec()).as_bytes(), b"b");
        assert_eq!(MacroArg::Bare(b"c".to_vec()).as_bytes(), b"c");
    }
}
