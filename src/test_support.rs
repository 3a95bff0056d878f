use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Self-signed P-256 certificate, subject `C=US, O=Example Trust, CN=Example Root CA`.
pub(crate) const EXAMPLE_CERT_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIB1DCCAXugAwIBAgIUYgHtOCQzJZZ30ncFncTvGiPCcHwwCgYIKoZIzj0EAwIw
PzELMAkGA1UEBhMCVVMxFjAUBgNVBAoMDUV4YW1wbGUgVHJ1c3QxGDAWBgNVBAMM
D0V4YW1wbGUgUm9vdCBDQTAgFw0yNjEwMTkxNjA3MzVaGA8yMTI2MDkyNTE2MDcz
NVowPzELMAkGA1UEBhMCVVMxFjAUBgNVBAoMDUV4YW1wbGUgVHJ1c3QxGDAWBgNV
BAMMD0V4YW1wbGUgUm9vdCBDQTBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABD87
8fglvc7OT/fefqhDq/zECxRqmK/RK24AvkWpIsCSf6ACORBWDr5oym13T+iclEb0
XbR4cjVKRPhVTNXMU/qjUzBRMB0GA1UdDgQWBBQSepvgCBaIUaUJ9G8r8ZkYObRj
3TAfBgNVHSMEGDAWgBQSepvgCBaIUaUJ9G8r8ZkYObRj3TAPBgNVHRMBAf8EBTAD
AQH/MAoGCCqGSM49BAMCA0cAMEQCID7Z7Phy+pjaoZ9LLP1hSqVcFAjerfmXXBxs
+jmqK2GRAiAztAK0ESUg/YWw5pfKJkE/KGPtL9wgpE2np0LWut1lZQ==
-----END CERTIFICATE-----";

pub(crate) const EXAMPLE_CERT_SHA256: &str = "5D:40:B6:5D:76:60:9E:3D:74:01:91:7C:BA:B0:B4:4B:6A:5C:19:6F:1B:DD:68:9E:07:4D:87:11:D6:30:DD:22";

pub(crate) const EXAMPLE_CERT_MD5: &str = "E9:48:D8:94:60:19:83:6D:F4:8E:63:C3:73:43:F3:C9";

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// One certificate object in bundle syntax.
pub(crate) fn cert_object(label: &str) -> String {
    format!(
        "[p11-kit-object-v1]\nclass: certificate\nlabel: \"{}\"\ntrusted: true\n{}\n",
        label, EXAMPLE_CERT_PEM
    )
}

/// A bundle with one certificate object per label, blank-line separated.
pub(crate) fn bundle_text(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| cert_object(label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trust directory populated with `(file name, labels)` bundles.
pub(crate) fn create_trust_dir(bundles: &[(&str, &[&str])]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, labels) in bundles {
        fs::write(temp_dir.path().join(name), bundle_text(labels)).unwrap();
    }
    temp_dir
}

/// Write a whitelist file next to (not inside) the trust directory.
pub(crate) fn write_whitelist(dir: &Path, patterns: &[&str]) -> PathBuf {
    let path = dir.join("whitelist.txt");
    fs::write(&path, patterns.join("\n")).unwrap();
    path
}

/// Every regular file directly under `dir`, sorted, with its content.
pub(crate) fn snapshot_dir(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| {
            (
                entry.file_name().to_string_lossy().to_string(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}
