// Default repository roots, relative to the working directory
const DEFAULT_CERTS_REPO: &str = "./root/ca/intermediate/certs/";
const DEFAULT_CSR_REPO: &str = "./root/ca/intermediate/csr/";

const CSR_FOLDER: &str = "csr/";
const CERTS_FOLDER: &str = "certs/";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default, alias = "certsRepo")]
    pub certs_repo: String,
    #[serde(default, alias = "csrRepo")]
    pub csr_repo: String,
    // If set, empty repository roots are placed under `<path_root>/certs/` and `<path_root>/csr/`
    #[serde(default, alias = "pathRoot", skip_serializing_if = "Option::is_none")]
    pub path_root: Option<String>,
    // Only carried around, nothing verifies against the chain
    #[serde(default, alias = "certChain", skip_serializing_if = "Option::is_none")]
    pub cert_chain: Option<String>,
}

impl Settings {
    pub fn new(certs_repo: &str, csr_repo: &str) -> Self {
        Self {
            certs_repo: certs_repo.to_owned(),
            csr_repo: csr_repo.to_owned(),
            path_root: None,
            cert_chain: None,
        }
        .finalize()
    }

    /**
     * Fills empty repository roots from `path_root` (if present) and makes sure every
     *     non-empty root ends with a path separator so file names can be appended directly.
     *
     * Empty roots stay empty.
     */
    pub fn finalize(mut self) -> Self {
        if let Some(root) = self.path_root.as_ref().filter(|root| !root.is_empty()) {
            let root = with_separator(root);

            if self.certs_repo.is_empty() {
                self.certs_repo = [root.as_str(), CERTS_FOLDER].concat();
            }
            if self.csr_repo.is_empty() {
                self.csr_repo = [root.as_str(), CSR_FOLDER].concat();
            }
        }

        self.certs_repo = with_separator(&self.certs_repo);
        self.csr_repo = with_separator(&self.csr_repo);

        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_CERTS_REPO, DEFAULT_CSR_REPO)
    }
}

fn with_separator(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR) {
        path.to_owned()
    } else {
        [path, "/"].concat()
    }
}
