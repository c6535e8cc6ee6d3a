// Copyright (c) 2018 Chef Software Inc. and/or applicable contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HMAC-SHA-256 signatures over the data-check-string.
//!
//! The HMAC key is not the bot token itself but its SHA-256 digest (raw
//! bytes). The key is derived on every call and dropped afterwards.

use hmac::{Hmac,
           Mac};
use sha2::{Digest,
           Sha256};
use subtle::ConstantTimeEq;

use crate::{canonical::data_check_string,
            config::SharedSecret,
            error::{Error,
                    Result},
            fields::ClaimedFields};

type HmacSha256 = Hmac<Sha256>;

fn signing_key(secret: &SharedSecret) -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    key
}

/// Lowercase hex HMAC of `data_check_string` keyed with SHA-256(`secret`).
pub fn compute_hash(secret: &SharedSecret, data_check_string: &str) -> String {
    let key = signing_key(secret);
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC can take key of any size");
    mac.update(data_check_string.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks `submitted` against the expected hash without short-circuiting on
/// the first differing byte.
pub fn verify_hash(secret: &SharedSecret, data_check_string: &str, submitted: &str) -> Result<()> {
    let expected = compute_hash(secret, data_check_string);
    if bool::from(expected.as_bytes().ct_eq(submitted.as_bytes())) {
        Ok(())
    } else {
        Err(Error::SignatureMismatch)
    }
}

/// The hash the widget would submit alongside `fields`. Any `hash` already
/// present in `fields` is ignored.
pub fn sign(secret: &SharedSecret, fields: &ClaimedFields) -> String {
    compute_hash(secret, &data_check_string(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::*;

    fn ada() -> ClaimedFields {
        vec![(ID, "42"),
             (FIRST_NAME, "Ada"),
             (LAST_NAME, "Lovelace"),
             (USERNAME, "ada"),
             (PHOTO_URL, "http://x/p.png"),
             (AUTH_DATE, "1700000000"),].into_iter()
                                         .collect()
    }

    #[test]
    fn signing_key_is_raw_sha256_digest() {
        // sha256("abc")
        assert_eq!(hex::encode(signing_key(&SharedSecret::new("abc"))),
                   "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn hash_is_lowercase_hex_of_64_chars() {
        let hash = compute_hash(&SharedSecret::new("s3cr3t"), "id=1");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn matches_hmac_keyed_with_digest() {
        let secret = SharedSecret::new("s3cr3t");
        let data = data_check_string(&ada());

        let key = Sha256::digest(b"s3cr3t");
        let mut mac = HmacSha256::new_from_slice(&key).unwrap();
        mac.update(data.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(sign(&secret, &ada()), expected);
        assert!(verify_hash(&secret, &data, &expected).is_ok());
    }

    #[test]
    fn sign_ignores_existing_hash() {
        let secret = SharedSecret::new("s3cr3t");
        let mut fields = ada();
        let unsigned = sign(&secret, &fields);
        fields.insert(HASH, "0".repeat(64));
        assert_eq!(sign(&secret, &fields), unsigned);
    }

    #[test]
    fn any_single_character_change_breaks_the_hash() {
        let secret = SharedSecret::new("s3cr3t");
        let original = ada();
        let hash = sign(&secret, &original);

        for (key, value) in original.iter() {
            let mut tampered = original.clone();
            tampered.insert(key, format!("{}x", value));
            assert_eq!(verify_hash(&secret, &data_check_string(&tampered), &hash),
                       Err(Error::SignatureMismatch),
                       "changing {} went unnoticed",
                       key);
        }
    }

    #[test]
    fn wrong_secret_or_altered_digit_is_rejected() {
        let data = data_check_string(&ada());
        let hash = compute_hash(&SharedSecret::new("s3cr3t"), &data);

        assert_eq!(verify_hash(&SharedSecret::new("other"), &data, &hash),
                   Err(Error::SignatureMismatch));

        let mut altered = hash.clone().into_bytes();
        altered[10] = if altered[10] == b'0' { b'1' } else { b'0' };
        let altered = String::from_utf8(altered).unwrap();
        assert_eq!(verify_hash(&SharedSecret::new("s3cr3t"), &data, &altered),
                   Err(Error::SignatureMismatch));

        assert_eq!(verify_hash(&SharedSecret::new("s3cr3t"), &data, &hash.to_uppercase()),
                   Err(Error::SignatureMismatch));
    }
}
