use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::error::RepoError;
use crate::settings::Settings;

pub mod structs;

pub use structs::{CertKind, Certificate};

// Owner, group and others may only read a stored artifact
pub const FILE_PERMISSIONS: u32 = 0o444;

// File name part that ends the host name of a stored certificate
const CERT_TOKEN: &str = "cert";

impl Certificate {
    /**
     * Creates a certificate from the textual type `kind` ('csr' or 'cert').
     *
     * Returns `Err(RepoError::InvalidKind)` for any other type, including an empty one.
     */
    pub fn new(host: &str, kind: &str, body: Vec<u8>) -> Result<Self, RepoError> {
        let kind = kind
            .parse::<CertKind>()
            .map_err(|_| RepoError::InvalidKind(kind.to_owned()))?;

        Ok(Self::with_kind(host, kind, body))
    }

    pub fn with_kind(host: &str, kind: CertKind, body: Vec<u8>) -> Self {
        Self {
            host: host.to_owned(),
            kind,
            body,
        }
    }

    /**
     * Reads a stored certificate from `file_path`.
     * The host is taken from the file name, every dot-separated part before the first
     *     'cert' part ('valid.domain.cert.pem' -> 'valid.domain').
     *     If there is no 'cert' part, the whole file name is used.
     *
     * The type is always `CertKind::Cert`, a csr cannot be loaded this way.
     */
    pub fn from_file(file_path: &str) -> Result<Self, RepoError> {
        debug!("Loading certificate file: '{}'", file_path);

        let body = read_file(file_path)?;

        Ok(Self::with_kind(
            &host_from_file_name(file_path),
            CertKind::Cert,
            body,
        ))
    }

    /**
     * Reads back the artifact of type `kind` stored for `host` in the repository.
     */
    pub fn load(settings: &Settings, kind: CertKind, host: &str) -> Result<Self, RepoError> {
        let mut cert = Self::with_kind(host, kind, Vec::new());
        cert.body = read_file(&cert.get_path(settings))?;

        Ok(cert)
    }

    /**
     * Determines the file path of the certificate in the repository:
     *     `<csr_repo><host>.csr.pem` or `<certs_repo><host>.cert.pem`.
     *
     * The repository root and the host are concatenated as-is.
     */
    pub fn get_path(&self, settings: &Settings) -> String {
        [
            self.kind.repo(settings),
            self.host.as_str(),
            ".",
            self.kind.extension(),
        ]
        .concat()
    }

    /**
     * Saves the certificate body to the path given by `get_path()`.
     * If the repository root for this type doesn't exist, it is created along with any missing parents.
     * The file is written with `FILE_PERMISSIONS`, an existing file is truncated if we're allowed to open it.
     *
     * NOTICE: The write is not atomic, a failure can leave a partially written file behind.
     *
     * Returns the path of the saved file.
     */
    pub fn save(&self, settings: &Settings) -> Result<String, RepoError> {
        let cert_path = self.get_path(settings);
        let repo = self.kind.repo(settings);

        if !repo.is_empty() && !Path::new(repo).exists() {
            info!("Creating {} repository '{}'", self.kind, repo);

            // Tolerates a directory created by someone else in the meantime
            fs::create_dir_all(repo).map_err(|source| RepoError::DirectoryCreate {
                path: repo.to_owned(),
                source,
            })?;
        }

        let write_err = |source| RepoError::Write {
            path: cert_path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(FILE_PERMISSIONS);

        let mut file = options.open(&cert_path).map_err(write_err)?;
        file.write_all(&self.body).map_err(write_err)?;

        debug!("Saved {} for '{}' to '{}'", self.kind, self.host, cert_path);

        Ok(cert_path)
    }
}

fn read_file(file_path: &str) -> Result<Vec<u8>, RepoError> {
    fs::read(file_path).map_err(|source| RepoError::Read {
        path: file_path.to_owned(),
        source,
    })
}

fn host_from_file_name(file_path: &str) -> String {
    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    file_name
        .split('.')
        .take_while(|part| *part != CERT_TOKEN)
        .collect::<Vec<&str>>()
        .join(".")
}
