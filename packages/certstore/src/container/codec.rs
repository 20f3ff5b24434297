//! Encoding and decoding of raw certificate payloads

use super::{CertContainer, ContainerError, MAX_WRAPPED_KEY_LEN, Result};
use der::asn1::AnyRef;
use der::{Decode, Tag, Tagged};

/// Width of each envelope length field
const LENGTH_FIELD_LEN: usize = 4;

/// Decode a raw payload into its certificate and optional wrapped key.
///
/// A payload that is exactly one DER SEQUENCE is returned as a bare
/// certificate. Anything else must be a complete envelope; every byte of the
/// input has to be accounted for by its length fields, and the certificate
/// field must itself be exactly one DER SEQUENCE.
pub fn decode(raw: &[u8]) -> Result<CertContainer> {
    if raw.is_empty() {
        return Err(ContainerError::Empty);
    }

    if is_single_sequence(raw) {
        return Ok(CertContainer::bare(raw));
    }

    let mut reader = EnvelopeReader::new(raw);

    let key_len = reader.read_len("wrapped key length")?;
    if key_len >= MAX_WRAPPED_KEY_LEN {
        return Err(ContainerError::WrappedKeyTooLarge {
            len: key_len,
            max: MAX_WRAPPED_KEY_LEN,
        });
    }
    let wrapped_key = reader.take(key_len, "wrapped key")?;

    let cert_len = reader.read_len("certificate length")?;
    if cert_len == 0 {
        return Err(ContainerError::MissingCertificate);
    }
    let certificate = reader.take(cert_len, "certificate")?;

    let trailing = reader.remaining();
    if trailing > 0 {
        return Err(ContainerError::TrailingBytes { count: trailing });
    }
    if !is_single_sequence(certificate) {
        return Err(ContainerError::NotDerSequence);
    }
    Ok(CertContainer::with_wrapped_key(certificate, wrapped_key))
}

/// Encode a certificate and optional wrapped key into the raw payload form.
///
/// Without a wrapped key the output is the certificate bytes unchanged, which
/// keeps bare-certificate records readable by older consumers.
pub fn encode(certificate: &[u8], wrapped_key: Option<&[u8]>) -> Result<Vec<u8>> {
    if certificate.is_empty() {
        return Err(ContainerError::MissingCertificate);
    }
    if !is_single_sequence(certificate) {
        return Err(ContainerError::NotDerSequence);
    }

    let Some(key) = wrapped_key else {
        return Ok(certificate.to_vec());
    };

    if key.len() >= MAX_WRAPPED_KEY_LEN {
        return Err(ContainerError::WrappedKeyTooLarge {
            len: key.len(),
            max: MAX_WRAPPED_KEY_LEN,
        });
    }
    let cert_len = u32::try_from(certificate.len()).map_err(|_| ContainerError::Oversized {
        len: certificate.len(),
        max: u32::MAX as usize,
    })?;

    let mut out = Vec::with_capacity(2 * LENGTH_FIELD_LEN + key.len() + certificate.len());
    // key.len() < MAX_WRAPPED_KEY_LEN, which fits in u32
    out.extend_from_slice(&(key.len() as u32).to_be_bytes());
    out.extend_from_slice(key);
    out.extend_from_slice(&cert_len.to_be_bytes());
    out.extend_from_slice(certificate);
    Ok(out)
}

/// True when `input` is exactly one DER SEQUENCE element, with no bytes left
/// over after it
fn is_single_sequence(input: &[u8]) -> bool {
    matches!(AnyRef::from_der(input), Ok(any) if any.tag() == Tag::Sequence)
}

/// Cursor over envelope bytes that reports framing errors by field
struct EnvelopeReader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> EnvelopeReader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(ContainerError::Truncated {
                field,
                expected: len,
                available,
            });
        }
        let slice = &self.input[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_len(&mut self, field: &'static str) -> Result<usize> {
        let bytes = self.take(LENGTH_FIELD_LEN, field)?;
        let mut buf = [0u8; LENGTH_FIELD_LEN];
        buf.copy_from_slice(bytes);
        Ok(u32::from_be_bytes(buf) as usize)
    }
}
