//! Password authentication over the link handshake (§4.B "Link
//! handshake"): the password is RSA-encrypted (PKCS#1 v1.5) with the
//! server's `pub_key` from `LINK_REPLY` and sent as the `AUTH_SPICE`
//! ticket body.

use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use spice_wire::error::ProtocolError;

/// Encrypt `password` with the server's DER-encoded SubjectPublicKeyInfo
/// RSA public key, as sent in `SpiceLinkReplyData::pub_key`.
pub fn encrypt_password(pub_key_der: &[u8], password: &str) -> Result<Vec<u8>, ProtocolError> {
    let key = RsaPublicKey::from_public_key_der(pub_key_der)
        .map_err(|_| ProtocolError::Malformed("server public key is not valid SubjectPublicKeyInfo DER"))?;

    // SPICE tickets are null-terminated.
    let mut plaintext = password.as_bytes().to_vec();
    plaintext.push(0);

    let mut rng = rand::thread_rng();
    key.encrypt(&mut rng, Pkcs1v15Encrypt, &plaintext)
        .map_err(|_| ProtocolError::Malformed("password encryption failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::EncodePublicKey;
    use rsa::RsaPrivateKey;

    #[test]
    fn encrypts_to_key_size_and_decrypts_back() {
        let mut rng = rand::thread_rng();
        let priv_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pub_key = RsaPublicKey::from(&priv_key);
        let der = pub_key.to_public_key_der().unwrap();

        let ciphertext = encrypt_password(der.as_bytes(), "hunter2").unwrap();
        assert_eq!(ciphertext.len(), 128);

        let decrypted = priv_key.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();
        assert_eq!(&decrypted, b"hunter2\0");
    }

    #[test]
    fn malformed_key_is_an_error() {
        assert!(encrypt_password(&[0u8; 4], "x").is_err());
    }
}
