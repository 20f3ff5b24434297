//! Owner derivation policy
//!
//! The owner is the equality key for lookups, so the order below is fixed:
//!
//! 1. first RFC-822 (email) subject alternative name
//! 2. first `emailAddress` attribute of the subject DN
//! 3. first DNS subject alternative name
//! 4. the subject DN in RFC 4514 string form
//!
//! Blank entries are skipped at every step. The chosen value is stored exactly
//! as written in the certificate, with no trimming or case folding.

use super::{CertificateError, Result};
use der::Decode;
use x509_cert::name::Name;
use x509_parser::prelude::*;

/// Derive the owner identity of a parsed certificate
pub(super) fn derive_owner(cert: &X509Certificate<'_>) -> Result<String> {
    let san = cert
        .subject_alternative_name()
        .map_err(|e| CertificateError::Extension(e.to_string()))?;
    let names: &[GeneralName<'_>] = san
        .as_ref()
        .map(|ext| ext.value.general_names.as_slice())
        .unwrap_or(&[]);

    let rfc822 = names.iter().find_map(|name| match name {
        GeneralName::RFC822Name(value) => non_empty(value),
        _ => None,
    });
    if let Some(email) = rfc822 {
        return Ok(email.to_string());
    }

    let subject_email = cert
        .subject()
        .iter_email()
        .find_map(|attr| attr.as_str().ok().and_then(non_empty));
    if let Some(email) = subject_email {
        return Ok(email.to_string());
    }

    let dns = names.iter().find_map(|name| match name {
        GeneralName::DNSName(value) => non_empty(value),
        _ => None,
    });
    if let Some(domain) = dns {
        return Ok(domain.to_string());
    }

    let dn = format_name(cert.subject().as_raw())?;
    if dn.is_empty() {
        return Err(CertificateError::NoOwnerIdentity);
    }
    Ok(dn)
}

/// The entry as written, unless it is blank
fn non_empty(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

/// Render a DER-encoded distinguished name per RFC 4514: RDNs in reverse
/// encoding order joined by `,`, multi-valued RDNs joined by `+`, string values
/// escaped and any other value as `#` followed by the hex of its DER encoding.
fn format_name(raw: &[u8]) -> Result<String> {
    let name = Name::from_der(raw).map_err(|e| CertificateError::Parse(e.to_string()))?;
    Ok(name.to_string())
}
