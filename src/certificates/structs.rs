use strum_macros::{Display, EnumString};

use crate::settings::Settings;

/**
 * The two artifact types kept in the repository.
 * Text is turned into a `CertKind` only through `FromStr`, anything other than
 *     `csr` or `cert` is rejected.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum CertKind {
    #[strum(serialize = "csr")]
    Csr,
    #[strum(serialize = "cert")]
    Cert,
}

impl CertKind {
    pub fn extension(self) -> &'static str {
        match self {
            CertKind::Csr => "csr.pem",
            CertKind::Cert => "cert.pem",
        }
    }

    /**
     * Returns the repository root configured for this kind.
     */
    pub fn repo(self, settings: &Settings) -> &str {
        match self {
            CertKind::Csr => &settings.csr_repo,
            CertKind::Cert => &settings.certs_repo,
        }
    }
}

// A csr or cert file
#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub host: String,
    pub kind: CertKind,
    pub body: Vec<u8>,
}
