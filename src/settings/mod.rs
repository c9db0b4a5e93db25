use std::fs::{self, File};
use std::io::{ErrorKind, Write};

use crate::error::RepoError;

pub mod structs;

pub use structs::Settings;

pub const SETTINGS_FILE: &str = "settings.json";

/**
 * Tries to load the settings file on `settings_loc` and logs the outcome.
 * If the file doesn't exist, a hint for generating it is logged as well.
 *
 * Returns `Ok(Settings)` if successful.
 */
pub fn init(settings_loc: &str) -> Result<Settings, RepoError> {
    match load(settings_loc) {
        Ok(settings) => {
            info!("Settings loaded successfully.");

            if let Some(chain) = &settings.cert_chain {
                debug!("Certificate chain configured at '{}', it is not verified against.", chain);
            }

            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load settings file. {}", e);

            if let RepoError::Read { source, .. } = &e {
                if source.kind() == ErrorKind::NotFound {
                    info!("Run with 'gen_settings' to generate a settings file.");
                }
            }

            Err(e)
        }
    }
}

/**
 * Reads the whole JSON settings file on `settings_loc` and parses it.
 * Missing keys are left empty, existence of the configured paths is not checked.
 *
 * Returns `Err(RepoError::Read)` if the file cannot be read and `Err(RepoError::Parse)`
 *     if it is not a valid settings document.
 */
pub fn load(settings_loc: &str) -> Result<Settings, RepoError> {
    info!("Loading settings file: '{}'", settings_loc);

    let contents = fs::read(settings_loc).map_err(|source| RepoError::Read {
        path: settings_loc.to_owned(),
        source,
    })?;

    let settings: Settings =
        serde_json::from_slice(&contents).map_err(|source| RepoError::Parse {
            path: settings_loc.to_owned(),
            source,
        })?;

    Ok(settings.finalize())
}

/**
 * Converts `Settings::default()` to JSON and saves it to `settings_loc`.
 * If the file already exits it is truncated.
 */
pub fn write_default(settings_loc: &str) -> Result<(), RepoError> {
    info!("Generating default settings file...");

    save_to_file(&Settings::default(), settings_loc)
}

fn save_to_file(settings: &Settings, settings_loc: &str) -> Result<(), RepoError> {
    let json_settings = serde_json::to_string_pretty(settings).map_err(RepoError::Serialize)?;

    let write_err = |source| RepoError::Write {
        path: settings_loc.to_owned(),
        source,
    };

    let mut file = File::create(settings_loc).map_err(write_err)?;
    file.write_all(json_settings.as_bytes()).map_err(write_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    fn write_settings(dir: &Path, contents: &str) -> String {
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[test]
    fn loads_repository_roots() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            dir.path(),
            r#"{ "certs_repo": "/srv/ca/certs/", "csr_repo": "/srv/ca/csr/" }"#,
        );

        let settings = load(&path).unwrap();
        assert_eq!(settings.certs_repo, "/srv/ca/certs/");
        assert_eq!(settings.csr_repo, "/srv/ca/csr/");
        assert_eq!(settings.cert_chain, None);
    }

    #[test]
    fn accepts_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            dir.path(),
            r#"{ "certsRepo": "certs/", "csrRepo": "csr/", "certChain": "chain.pem" }"#,
        );

        let settings = load(&path).unwrap();
        assert_eq!(settings.certs_repo, "certs/");
        assert_eq!(settings.csr_repo, "csr/");
        assert_eq!(settings.cert_chain.as_deref(), Some("chain.pem"));
    }

    #[test]
    fn missing_keys_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), "{}");

        let settings = load(&path).unwrap();
        assert_eq!(settings.certs_repo, "");
        assert_eq!(settings.csr_repo, "");
    }

    #[test]
    fn roots_get_trailing_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            dir.path(),
            r#"{ "certs_repo": "/srv/ca/certs", "csr_repo": "/srv/ca/csr" }"#,
        );

        let settings = load(&path).unwrap();
        assert_eq!(settings.certs_repo, "/srv/ca/certs/");
        assert_eq!(settings.csr_repo, "/srv/ca/csr/");

        assert_eq!(Settings::new("a", "b/"), Settings::new("a/", "b/"));
    }

    #[test]
    fn path_root_fills_empty_roots() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            dir.path(),
            r#"{ "pathRoot": "/root/ca/intermediate", "csr_repo": "/tmp/csr/" }"#,
        );

        let settings = load(&path).unwrap();
        assert_eq!(settings.certs_repo, "/root/ca/intermediate/certs/");
        assert_eq!(settings.csr_repo, "/tmp/csr/");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        match load(path.to_str().unwrap()) {
            Err(RepoError::Read { source, .. }) => assert_eq!(source.kind(), ErrorKind::NotFound),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_settings(dir.path(), "certs_repo = \"/srv\"");
        assert!(matches!(load(&path), Err(RepoError::Parse { .. })));

        let path = write_settings(dir.path(), r#"{ "certs_repo": 12 }"#);
        assert!(matches!(load(&path), Err(RepoError::Parse { .. })));
    }

    #[test]
    fn default_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let path = path.to_str().unwrap();

        write_default(path).unwrap();
        // Truncates on the second run
        write_default(path).unwrap();

        let settings = load(path).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.csr_repo, "./root/ca/intermediate/csr/");
        assert_eq!(settings.certs_repo, "./root/ca/intermediate/certs/");
    }
}
