//! Certificate introspection for `--print`.

use serde::Serialize;

/// Digests and subject attributes of one certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// `(algorithm, colon-separated uppercase hex)` pairs.
    pub fingerprints: Vec<(String, String)>,
    /// Subject attributes in RDN order, e.g. `("CN", "Example Root CA")`.
    pub attributes: Vec<(String, String)>,
}

/// Reads details out of a PEM-encoded certificate.
pub trait CertificateInspector {
    fn inspect(&self, pem_block: &str) -> anyhow::Result<CertificateInfo>;
}

/// The inspector compiled into this build, if any.
pub fn default_inspector() -> Option<Box<dyn CertificateInspector>> {
    #[cfg(feature = "x509")]
    {
        Some(Box::new(X509Inspector))
    }
    #[cfg(not(feature = "x509"))]
    {
        None
    }
}

#[cfg(feature = "x509")]
pub use x509::X509Inspector;

#[cfg(feature = "x509")]
mod x509 {
    use super::{CertificateInfo, CertificateInspector};
    use anyhow::{Context, bail};
    use md5::Md5;
    use sha2::{Digest, Sha256};
    use x509_cert::Certificate;
    use x509_cert::der::Decode;

    /// SHA-256 and MD5 fingerprints plus subject attributes via `x509-cert`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct X509Inspector;

    impl CertificateInspector for X509Inspector {
        fn inspect(&self, pem_block: &str) -> anyhow::Result<CertificateInfo> {
            let parsed = pem::parse(pem_block).context("invalid PEM encoding")?;
            if parsed.tag() != "CERTIFICATE" {
                bail!("PEM block is '{}', not a certificate", parsed.tag());
            }

            let der = parsed.contents();
            let cert = Certificate::from_der(der).context("invalid X.509 certificate")?;

            let fingerprints = vec![
                ("SHA256".to_string(), colon_hex(&Sha256::digest(der))),
                ("MD5".to_string(), colon_hex(&Md5::digest(der))),
            ];

            let mut attributes = Vec::new();
            for rdn in cert.tbs_certificate.subject.0.iter() {
                for atv in rdn.0.iter() {
                    let rendered = atv.to_string();
                    match rendered.split_once('=') {
                        Some((name, value)) => {
                            attributes.push((name.to_string(), value.to_string()))
                        }
                        None => attributes.push((atv.oid.to_string(), rendered)),
                    }
                }
            }

            Ok(CertificateInfo {
                fingerprints,
                attributes,
            })
        }
    }

    fn colon_hex(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|byte| hex::encode_upper([*byte]))
            .collect::<Vec<_>>()
            .join(":")
    }

}
