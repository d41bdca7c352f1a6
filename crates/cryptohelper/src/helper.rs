//! [`CryptoHelper`]: the four public operations over one set of secret material.

use std::sync::Arc;

use common::{Envelope, HelperError};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::crypto::{cipher, digest, password};
use crate::secret::SecretMaterial;

/// Hashing, JSON envelope encryption, and Argon2 verification.
///
/// Cheap to clone; clones share the same read-only [`SecretMaterial`].
#[derive(Clone, Debug)]
pub struct CryptoHelper {
    secret: Arc<SecretMaterial>,
}

impl CryptoHelper {
    /// Create a helper around already-validated secret material.
    pub fn new(secret: SecretMaterial) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Create a helper from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Config`] if the key or IV cannot be decoded.
    pub fn from_config(cfg: &Config) -> Result<Self, HelperError> {
        let secret = cfg
            .secret_material()
            .map_err(|e| HelperError::Config(format!("{e:#}")))?;
        info!("crypto helper initialised from configuration");
        Ok(Self::new(secret))
    }

    /// Load configuration (including any `.env` file) and build a helper.
    ///
    /// Intended to be called once at process start; an error here should stop
    /// the process.
    pub fn from_env() -> Result<Self, HelperError> {
        let cfg = Config::load().map_err(|e| HelperError::Config(format!("{e:#}")))?;
        Self::from_config(&cfg)
    }

    /// Unsalted SHA-512 of `password`, as 128 lowercase hex characters.
    pub fn hash_key(&self, password: impl AsRef<[u8]>) -> String {
        digest::sha512_hex(password)
    }

    /// Awaitable form of [`CryptoHelper::hash_key`]. Computes inline.
    pub async fn hash_key_async(&self, password: impl AsRef<[u8]>) -> String {
        self.hash_key(password)
    }

    /// Serialise `value` to JSON and encrypt it under the configured key and IV.
    ///
    /// Object keys keep the order they were given in. The returned IV is always
    /// the configured one, so equal values encrypt to equal ciphertexts.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Serialization`] if `value` has no JSON form
    /// (for example a map with non-string keys).
    pub fn encrypt_data<T>(&self, value: &T) -> Result<Envelope, HelperError>
    where
        T: Serialize + ?Sized,
    {
        let json = Zeroizing::new(
            serde_json::to_vec(value).map_err(|e| HelperError::Serialization(e.to_string()))?,
        );
        let ciphertext = cipher::encrypt_cbc(&json, self.secret.key(), self.secret.iv());
        debug!(
            plaintext_len = json.len(),
            ciphertext_len = ciphertext.len(),
            "encrypted payload"
        );
        Ok(Envelope::new(hex::encode(ciphertext), self.secret.iv_hex()))
    }

    /// Decrypt a hex ciphertext with the given hex IV and parse it as JSON.
    ///
    /// `iv` need not be the configured IV; any 16-byte IV is accepted so that
    /// envelopes written under an earlier IV still open.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Decryption`] with the stage that failed: hex,
    /// IV length, ciphertext length, padding, UTF-8, or JSON.
    pub fn decrypt_data(
        &self,
        encrypted_data: &str,
        iv: &str,
    ) -> Result<serde_json::Value, HelperError> {
        self.decrypt_data_as(encrypted_data, iv)
    }

    /// Like [`CryptoHelper::decrypt_data`], deserialising into `T`.
    ///
    /// Well-formed JSON of the wrong shape is reported as
    /// [`DecryptError::InvalidJson`](common::DecryptError::InvalidJson).
    pub fn decrypt_data_as<T>(&self, encrypted_data: &str, iv: &str) -> Result<T, HelperError>
    where
        T: DeserializeOwned,
    {
        let plaintext = Zeroizing::new(self.decrypt_bytes(encrypted_data, iv)?);
        let text = std::str::from_utf8(&plaintext).map_err(|_| common::DecryptError::InvalidUtf8)?;
        let value = serde_json::from_str(text)
            .map_err(|e| common::DecryptError::InvalidJson(e.to_string()))?;
        Ok(value)
    }

    /// Decrypt an [`Envelope`] as returned by [`CryptoHelper::encrypt_data`].
    pub fn decrypt_envelope(&self, envelope: &Envelope) -> Result<serde_json::Value, HelperError> {
        self.decrypt_data(&envelope.encrypted_data, &envelope.iv)
    }

    fn decrypt_bytes(&self, encrypted_data: &str, iv: &str) -> Result<Vec<u8>, HelperError> {
        let iv = cipher::decode_iv(iv)?;
        let ciphertext = cipher::decode_ciphertext(encrypted_data)?;
        let plaintext = cipher::decrypt_cbc(&ciphertext, self.secret.key(), &iv)?;
        debug!(
            ciphertext_len = ciphertext.len(),
            plaintext_len = plaintext.len(),
            "decrypted payload"
        );
        Ok(plaintext)
    }

    /// `true` only if `candidate` matches the Argon2 `hash`. Never errors.
    pub fn argon_verify(&self, hash: &str, candidate: &str) -> bool {
        password::argon_verify(hash, candidate)
    }

    /// [`CryptoHelper::argon_verify`] on Tokio's blocking pool.
    ///
    /// Outside a Tokio runtime the check runs inline on the polling thread.
    /// A panicked or cancelled verification task also yields `false`.
    pub async fn argon_verify_async(&self, hash: &str, candidate: &str) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return password::argon_verify(hash, candidate);
        };
        let hash = hash.to_owned();
        let candidate = Zeroizing::new(candidate.to_owned());
        let task = handle.spawn_blocking(move || password::argon_verify(&hash, &candidate));
        match task.await {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "password verification task failed; treating as no match");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::password::tests::hash_with;
    use argon2::Algorithm;
    use common::{DecryptError, HexField};
    use futures::executor::block_on;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn zero_helper() -> CryptoHelper {
        CryptoHelper::new(SecretMaterial::from_bytes(&[0u8; 32], &[0u8; 16]).unwrap())
    }

    fn helper_with(key: u8, iv: u8) -> CryptoHelper {
        CryptoHelper::new(SecretMaterial::from_bytes(&[key; 32], &[iv; 16]).unwrap())
    }

    fn decrypt_err(helper: &CryptoHelper, data: &str, iv: &str) -> DecryptError {
        match helper.decrypt_data(data, iv) {
            Err(HelperError::Decryption(e)) => e,
            other => panic!("expected decryption error, got {other:?}"),
        }
    }

    #[test]
    fn hash_key_is_deterministic_sha512() {
        let helper = zero_helper();
        let a = helper.hash_key("password");
        assert_eq!(a, helper.hash_key("password"));
        assert_eq!(
            a,
            "b109f3bbbc244eb82441917ed06d618b9008dd09b3befd1b5e07394c706a8bb9\
             80b1d7785e5976ec049b46df5f1326af5a2ea6d103fd07c95385ffab0cacbc86"
        );
        assert_ne!(a, helper.hash_key("Password"));
        assert_eq!(a.len(), 128);
    }

    #[test]
    fn hash_key_ignores_secret_material() {
        assert_eq!(
            zero_helper().hash_key("abc"),
            helper_with(0x42, 0x24).hash_key("abc")
        );
    }

    #[tokio::test]
    async fn hash_key_async_matches_sync() {
        let helper = zero_helper();
        assert_eq!(helper.hash_key_async("abc").await, helper.hash_key("abc"));
    }

    #[test]
    fn zero_key_regression_vector() {
        let env = zero_helper().encrypt_data(&json!({"a": 1})).unwrap();
        assert_eq!(env.encrypted_data, "4d2d211dc75952d6f5671c4d6089d418");
        assert_eq!(env.iv, "00000000000000000000000000000000");
    }

    #[test]
    fn multi_block_vector() {
        let value = json!({"user": "alice", "roles": ["admin", "ops"], "active": true});
        let env = zero_helper().encrypt_data(&value).unwrap();
        assert_eq!(
            env.encrypted_data,
            "24c303602e2111c124a031b3b45ff5b39d0e868cf53ff2fd90ed9c4ab4d65a47\
             218ef5781771633da9eeee07de6bd93ee9b643abdaf5a48f5d7b471786c6d33c"
        );
    }

    #[test]
    fn round_trips_json_values() {
        let helper = helper_with(0x42, 0x24);
        let values = [
            json!({"a": 1}),
            json!({"nested": {"list": [1, 2.5, null, "x"]}, "flag": false}),
            json!([1, "two", {"three": 3}]),
            json!("just a string with ünïcödé"),
            json!(42),
            json!(null),
            json!({}),
        ];
        for value in values {
            let env = helper.encrypt_data(&value).unwrap();
            assert_eq!(helper.decrypt_envelope(&env).unwrap(), value);
        }
    }

    #[test]
    fn round_trips_typed_values() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Profile {
            name: String,
            age: u32,
            tags: Vec<String>,
        }

        let helper = zero_helper();
        let profile = Profile {
            name: "Alice".into(),
            age: 30,
            tags: vec!["a".into(), "b".into()],
        };
        let env = helper.encrypt_data(&profile).unwrap();
        let decoded: Profile = helper.decrypt_data_as(&env.encrypted_data, &env.iv).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn wrong_shape_is_invalid_json() {
        let helper = zero_helper();
        let env = helper.encrypt_data(&json!({"a": 1})).unwrap();
        let err = helper
            .decrypt_data_as::<Vec<u32>>(&env.encrypted_data, &env.iv)
            .unwrap_err();
        assert!(matches!(
            err,
            HelperError::Decryption(DecryptError::InvalidJson(_))
        ));
    }

    #[test]
    fn object_key_order_is_preserved() {
        let helper = zero_helper();
        let value: serde_json::Value = serde_json::from_str(r#"{"b":1,"a":2,"c":3}"#).unwrap();
        let env = helper.encrypt_data(&value).unwrap();
        let bytes = hex::decode(&env.encrypted_data).unwrap();
        let plaintext = cipher::decrypt_cbc(&bytes, &[0u8; 32], &[0u8; 16]).unwrap();
        assert_eq!(plaintext, br#"{"b":1,"a":2,"c":3}"#);
        let decrypted = helper.decrypt_envelope(&env).unwrap();
        assert_eq!(decrypted.to_string(), r#"{"b":1,"a":2,"c":3}"#);
    }

    #[test]
    fn equal_values_give_equal_ciphertexts() {
        let helper = helper_with(7, 9);
        let a = helper.encrypt_data(&json!({"x": "y"})).unwrap();
        let b = helper.encrypt_data(&json!({"x": "y"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unserialisable_value_is_reported() {
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "tuple keys have no JSON form");
        let err = zero_helper().encrypt_data(&map).unwrap_err();
        assert!(matches!(err, HelperError::Serialization(_)));
        assert_eq!(err.code(), "serialization_error");
    }

    #[test]
    fn decrypts_with_caller_supplied_iv() {
        let helper = zero_helper();
        // Encrypted under the zero key with an IV other than the configured one.
        let data = "298dd925620eba29193a9ac33832fc54";
        let iv = "11".repeat(16);
        assert_eq!(helper.decrypt_data(data, &iv).unwrap(), json!("hello"));
    }

    #[test]
    fn accepts_uppercase_hex() {
        let helper = zero_helper();
        let value = helper
            .decrypt_data("4D2D211DC75952D6F5671C4D6089D418", &"00".repeat(16))
            .unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn wrong_key_or_iv_is_bad_padding() {
        let env = zero_helper().encrypt_data(&json!({"a": 1})).unwrap();
        assert_eq!(
            decrypt_err(&helper_with(1, 0), &env.encrypted_data, &env.iv),
            DecryptError::BadPadding
        );
        assert_eq!(
            decrypt_err(&zero_helper(), &env.encrypted_data, &"11".repeat(16)),
            DecryptError::BadPadding
        );
    }

    #[test]
    fn tampering_never_returns_the_encrypted_value() {
        let helper = zero_helper();
        let value = json!({"user": "alice", "roles": ["admin", "ops"], "active": true});
        let env = helper.encrypt_data(&value).unwrap();
        for i in 0..env.encrypted_data.len() {
            let mut chars: Vec<char> = env.encrypted_data.chars().collect();
            chars[i] = if chars[i] == '0' { '1' } else { '0' };
            let tampered: String = chars.into_iter().collect();
            match helper.decrypt_data(&tampered, &env.iv) {
                Err(HelperError::Decryption(_)) => {}
                Err(other) => panic!("unexpected error kind at {i}: {other}"),
                Ok(decrypted) => assert_ne!(decrypted, value, "tamper at {i} went unnoticed"),
            }
        }
    }

    #[test]
    fn malformed_hex_is_reported() {
        let helper = zero_helper();
        let iv = "00".repeat(16);
        assert_eq!(
            decrypt_err(&helper, "4d2d2", &iv),
            DecryptError::InvalidHex {
                field: HexField::Ciphertext
            }
        );
        assert_eq!(
            decrypt_err(&helper, "not hex at all!!", &iv),
            DecryptError::InvalidHex {
                field: HexField::Ciphertext
            }
        );
        assert_eq!(
            decrypt_err(&helper, "4d2d211dc75952d6f5671c4d6089d418", "xyz"),
            DecryptError::InvalidHex { field: HexField::Iv }
        );
    }

    #[test]
    fn misaligned_ciphertext_is_reported() {
        let helper = zero_helper();
        let iv = "00".repeat(16);
        assert_eq!(
            decrypt_err(&helper, "abcd", &iv),
            DecryptError::InvalidCiphertextLength(2)
        );
        assert_eq!(
            decrypt_err(&helper, &"ab".repeat(17), &iv),
            DecryptError::InvalidCiphertextLength(17)
        );
        assert_eq!(
            decrypt_err(&helper, "", &iv),
            DecryptError::InvalidCiphertextLength(0)
        );
    }

    #[test]
    fn short_iv_is_reported() {
        assert_eq!(
            decrypt_err(&zero_helper(), "4d2d211dc75952d6f5671c4d6089d418", "0000"),
            DecryptError::InvalidIvLength(2)
        );
    }

    #[test]
    fn non_utf8_plaintext_is_reported() {
        let ct = cipher::encrypt_cbc(&[0xff, 0xfe, 0xfd], &[0u8; 32], &[0u8; 16]);
        assert_eq!(
            decrypt_err(&zero_helper(), &hex::encode(ct), &"00".repeat(16)),
            DecryptError::InvalidUtf8
        );
    }

    #[test]
    fn non_json_plaintext_is_reported() {
        let ct = cipher::encrypt_cbc(b"{not json", &[0u8; 32], &[0u8; 16]);
        assert!(matches!(
            decrypt_err(&zero_helper(), &hex::encode(ct), &"00".repeat(16)),
            DecryptError::InvalidJson(_)
        ));
    }

    #[test]
    fn argon_verify_is_fail_closed() {
        let helper = zero_helper();
        let hash = hash_with(Algorithm::Argon2id, "secret");
        assert!(helper.argon_verify(&hash, "secret"));
        assert!(!helper.argon_verify(&hash, "wrong"));
        assert!(!helper.argon_verify("not-a-valid-hash", "anything"));
    }

    #[tokio::test]
    async fn argon_verify_async_matches_sync() {
        let helper = zero_helper();
        let hash = hash_with(Algorithm::Argon2id, "secret");
        assert!(helper.argon_verify_async(&hash, "secret").await);
        assert!(!helper.argon_verify_async(&hash, "wrong").await);
        assert!(!helper.argon_verify_async("not-a-valid-hash", "anything").await);
    }

    #[test]
    fn argon_verify_async_without_runtime_runs_inline() {
        let helper = zero_helper();
        let hash = hash_with(Algorithm::Argon2id, "secret");
        assert!(!block_on(helper.argon_verify_async("not-a-valid-hash", "x")));
        assert!(block_on(helper.argon_verify_async(&hash, "secret")));
        assert!(!block_on(helper.argon_verify_async(&hash, "wrong")));
    }

    #[tokio::test]
    async fn clones_share_secret_across_tasks() {
        let helper = helper_with(3, 5);
        let expected = helper.encrypt_data(&json!({"n": 1})).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let helper = helper.clone();
                tokio::spawn(async move { helper.encrypt_data(&json!({"n": 1})).unwrap() })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
    }

    #[test]
    fn from_config_builds_working_helper() {
        let cfg = Config::from_vars([("SECRET_KEY", "00".repeat(32)), ("IV", "00".repeat(16))])
            .unwrap();
        let helper = CryptoHelper::from_config(&cfg).unwrap();
        let env = helper.encrypt_data(&json!({"a": 1})).unwrap();
        assert_eq!(env.encrypted_data, "4d2d211dc75952d6f5671c4d6089d418");
    }

    #[test]
    fn from_config_rejects_bad_material() {
        let cfg = Config {
            secret_key: "00".repeat(16),
            iv: "00".repeat(16),
            log_level: "info".into(),
        };
        let err = CryptoHelper::from_config(&cfg).unwrap_err();
        assert!(matches!(err, HelperError::Config(_)));
        assert!(err.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let helper = helper_with(0xab, 0xcd);
        let dbg = format!("{helper:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("ab"));
    }
}
