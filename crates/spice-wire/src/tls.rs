//! Client-side TLS for the "secure" channel set.
//!
//! Mirrors the shape of the teacher's `tls.rs` (a `TlsContext` bundling
//! what the transport needs plus a key/cert detail the protocol cares
//! about) but in client configuration: a `rustls::ClientConfig` built
//! either from a pinned CA certificate file (`--ca-file`, the common
//! SPICE client deployment) or, when none is configured, a verifier
//! that accepts any certificate — SPICE servers are commonly
//! self-signed and the original client trusts the server-sent
//! `pub_key` from the link handshake as the actual authentication
//! anchor, not the TLS certificate chain.

use std::path::Path;
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio_rustls::TlsConnector;

use crate::error::WireError;

/// Accepts any server certificate. Used when the client was not
/// configured with a CA file; the link-handshake `pub_key` is the
/// actual trust anchor for SPICE sessions run this way.
#[derive(Debug)]
struct AcceptAnyCert;

impl ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ED25519,
        ]
    }
}

pub struct TlsContext {
    pub connector: TlsConnector,
}

/// Build a client TLS context that pins trust to `ca_path` (a PEM file
/// of one or more CA certificates).
pub fn load_from_ca_file(ca_path: &Path) -> Result<TlsContext, WireError> {
    tracing::info!(?ca_path, "loading SPICE CA certificate");
    let pem = std::fs::read(ca_path)?;
    let mut reader = std::io::BufReader::new(pem.as_slice());
    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert?;
        roots
            .add(cert)
            .map_err(|e| WireError::Tls(rustls::Error::General(e.to_string())))?;
    }
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(TlsContext {
        connector: TlsConnector::from(Arc::new(config)),
    })
}

/// Build a client TLS context that accepts any server certificate.
/// Used when no `--ca-file` is configured; the link-handshake public
/// key remains the real trust anchor.
pub fn insecure() -> TlsContext {
    tracing::warn!("SPICE TLS configured without a pinned CA: accepting any server certificate");
    let mut config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth();
    #[cfg(debug_assertions)]
    {
        config.key_log = Arc::new(rustls::KeyLogFile::new());
    }
    TlsContext {
        connector: TlsConnector::from(Arc::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insecure_context_builds() {
        let _ctx = insecure();
    }
}
