//! Container envelope behaviour against real certificates

mod common;

use certstore::container::{decode, encode};
use certstore::{CertContainer, ContainerError};
use common::*;
use proptest::prelude::*;

/// Wrap arbitrary content in a DER SEQUENCE header
fn der_sequence(content: &[u8]) -> Vec<u8> {
    let mut out = vec![0x30];
    match content.len() {
        len @ 0..=0x7f => out.push(len as u8),
        len @ 0x80..=0xff => out.extend_from_slice(&[0x81, len as u8]),
        len => {
            out.push(0x82);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
    }
    out.extend_from_slice(content);
    out
}

#[test]
fn fixture_envelope_is_key_then_certificate() {
    let envelope = gm2552_with_wrapped_key();

    let key_len = GM2552_KEY_DER.len();
    assert_eq!(&envelope[..4], &(key_len as u32).to_be_bytes());
    assert_eq!(&envelope[4..4 + key_len], GM2552_KEY_DER);
    assert_eq!(
        &envelope[4 + key_len..8 + key_len],
        &(GM2552_DER.len() as u32).to_be_bytes()
    );
    assert_eq!(&envelope[8 + key_len..], GM2552_DER);

    let container = decode(&envelope).unwrap();
    assert_eq!(container.certificate(), GM2552_DER);
    assert_eq!(container.wrapped_key(), Some(GM2552_KEY_DER));
    assert_eq!(container.encode().unwrap(), envelope);
}

#[test]
fn bare_fixture_decodes_without_key() {
    for der in [GM2552_DER, UMESH_DER, DNONLY_DER] {
        let container = decode(der).unwrap();
        assert_eq!(container.certificate(), der);
        assert!(!container.has_wrapped_key());
        assert_eq!(container.encode().unwrap(), der);
    }
}

#[test]
fn key_alone_is_not_a_certificate_container() {
    // A PKCS#8 key is itself a DER SEQUENCE, so it decodes as a bare payload;
    // metadata extraction is what rejects it.
    let container = decode(GM2552_KEY_DER).unwrap();
    assert!(!container.has_wrapped_key());
    assert!(certstore::metadata::extract(container.certificate()).is_err());
}

#[test]
fn envelope_with_non_der_certificate_is_rejected() {
    let raw = [0, 0, 0, 0, 0, 0, 0, 1, 0xff];
    assert_eq!(decode(&raw), Err(ContainerError::NotDerSequence));
}

#[test]
fn encode_requires_der_certificate() {
    assert_eq!(
        encode(b"plain text", Some(GM2552_KEY_DER)),
        Err(ContainerError::NotDerSequence)
    );
    assert_eq!(encode(&[], None), Err(ContainerError::MissingCertificate));
}

#[test]
fn truncated_fixture_envelope_is_rejected() {
    let envelope = gm2552_with_wrapped_key();
    let truncated = &envelope[..envelope.len() - 1];
    assert!(matches!(
        decode(truncated),
        Err(ContainerError::Truncated {
            field: "certificate",
            ..
        })
    ));

    let mut extended = envelope.clone();
    extended.push(0x00);
    assert_eq!(
        decode(&extended),
        Err(ContainerError::TrailingBytes { count: 1 })
    );
}

proptest! {
    #[test]
    fn envelope_round_trip(
        content in prop::collection::vec(any::<u8>(), 0..600),
        key in prop::option::of(prop::collection::vec(any::<u8>(), 0..600)),
    ) {
        let certificate = der_sequence(&content);
        let original = match &key {
            Some(key) => CertContainer::with_wrapped_key(certificate.clone(), key.clone()),
            None => CertContainer::bare(certificate.clone()),
        };

        let encoded = encode(&certificate, key.as_deref()).unwrap();
        prop_assert_eq!(&original.encode().unwrap(), &encoded);

        let decoded = decode(&encoded).unwrap();
        prop_assert_eq!(decoded.certificate(), certificate.as_slice());
        prop_assert_eq!(decoded.wrapped_key(), key.as_deref());
    }

    #[test]
    fn anything_decoded_re_encodes_identically(raw in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(container) = decode(&raw) {
            prop_assert_eq!(container.encode().unwrap(), raw);
        }
    }

    #[test]
    fn envelope_fields_re_encode_identically(
        key in prop::collection::vec(any::<u8>(), 0..64),
        certificate in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut raw = (key.len() as u32).to_be_bytes().to_vec();
        raw.extend_from_slice(&key);
        raw.extend_from_slice(&(certificate.len() as u32).to_be_bytes());
        raw.extend_from_slice(&certificate);

        match decode(&raw) {
            Ok(container) => {
                prop_assert_eq!(container.encode().unwrap(), raw);
            }
            Err(error) => {
                prop_assert_eq!(error, ContainerError::NotDerSequence);
            }
        }
    }
}
