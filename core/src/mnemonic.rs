mod error;

use std::cmp;
use std::fmt::{Debug, Formatter};

use bip39::Language;
use ed25519_dalek::{Signer, SigningKey};
pub use error::*;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;

pub const MNEMONIC_WORD_COUNT: usize = 24;
const PBKDF_ITERATIONS: u32 = 100000;
const SEED_LEN: usize = 64;

/// TON mnemonic: 24 BIP-39 English words with an optional password.
///
/// Unlike BIP-39 the checksum is not encoded in the words; validity is a property
/// of the derived entropy (see [`Mnemonic::new`]).
pub struct Mnemonic {
    words: Vec<String>,
    password: Option<String>,
}

/// Ed25519 key pair derived from a mnemonic.
///
/// `secret_key` is the 64-byte expanded form: 32-byte seed followed by the public key.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct KeyPair {
    pub public_key: Vec<u8>,
    pub secret_key: Vec<u8>,
}

impl Mnemonic {
    /// Normalizes and validates the words.
    ///
    /// A passwordless mnemonic is valid when the first byte of its `"TON seed version"`
    /// hash is zero. A password-protected one must pass the `"TON fast seed version"` check
    /// and must not also be a valid passwordless mnemonic.
    pub fn new(words: Vec<&str>, password: &Option<String>) -> Result<Mnemonic, MnemonicError> {
        let normalized_words: Vec<String> = words.iter().map(|w| w.trim().to_lowercase()).collect();

        if normalized_words.len() != MNEMONIC_WORD_COUNT {
            return Err(MnemonicError::UnexpectedWordCount(normalized_words.len()));
        }
        if let Some(word) = normalized_words
            .iter()
            .find(|w| Language::English.find_word(w).is_none())
        {
            return Err(MnemonicError::InvalidWord(word.clone()));
        }

        let password = password.clone().filter(|p| !p.is_empty());
        match &password {
            Some(_) => {
                let passless_entropy = to_entropy(&normalized_words, &None)?;
                let seed = pbkdf2_sha512(&passless_entropy, "TON fast seed version", 1);
                if seed[0] != 1 {
                    return Err(MnemonicError::InvalidFirstByte(seed[0]));
                }
                let entropy = to_entropy(&normalized_words, &password)?;
                let seed = pbkdf2_sha512(
                    &entropy,
                    "TON seed version",
                    cmp::max(1, PBKDF_ITERATIONS / 256),
                );
                if seed[0] == 0 {
                    return Err(MnemonicError::InvalidFirstByte(seed[0]));
                }
            }
            None => {
                let entropy = to_entropy(&normalized_words, &None)?;
                let seed = pbkdf2_sha512(
                    &entropy,
                    "TON seed version",
                    cmp::max(1, PBKDF_ITERATIONS / 256),
                );
                if seed[0] != 0 {
                    return Err(MnemonicError::InvalidPasswordlessMnemonicFirstByte(seed[0]));
                }
            }
        }

        Ok(Mnemonic {
            words: normalized_words,
            password,
        })
    }

    pub fn from_str(s: &str, password: &Option<String>) -> Result<Mnemonic, MnemonicError> {
        let words: Vec<&str> = s.split_whitespace().collect();
        Mnemonic::new(words, password)
    }

    pub fn to_key_pair(&self) -> Result<KeyPair, MnemonicError> {
        let entropy = to_entropy(&self.words, &self.password)?;
        let seed = pbkdf2_sha512(&entropy, "TON default seed", PBKDF_ITERATIONS);
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[0..32]);
        let signing_key = SigningKey::from_bytes(&secret);
        Ok(KeyPair {
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
            secret_key: signing_key.to_keypair_bytes().to_vec(),
        })
    }
}

impl Debug for Mnemonic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &"***REDACTED***")
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .finish()
    }
}

impl KeyPair {
    /// Signs `message` with the Ed25519 key, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; 64], MnemonicError> {
        let secret: [u8; 32] = self
            .secret_key
            .get(0..32)
            .and_then(|s| s.try_into().ok())
            .ok_or(MnemonicError::InvalidSecretKeyLength(self.secret_key.len()))?;
        Ok(SigningKey::from_bytes(&secret).sign(message).to_bytes())
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(&self.public_key))
            .field("secret_key", &"***REDACTED***")
            .finish()
    }
}

fn to_entropy(words: &[String], password: &Option<String>) -> Result<Vec<u8>, MnemonicError> {
    let mut mac = Hmac::<Sha512>::new_from_slice(words.join(" ").as_bytes())?;
    if let Some(s) = password {
        mac.update(s.as_bytes());
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

fn pbkdf2_sha512(key: &[u8], salt: &str, rounds: u32) -> [u8; SEED_LEN] {
    let mut output = [0u8; SEED_LEN];
    pbkdf2_hmac::<Sha512>(key, salt.as_bytes(), rounds, &mut output);
    output
}

///Based on https://github.com/tonwhales/ton-crypto/blob/master/src/mnemonic/mnemonic.spec.ts
#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    use crate::mnemonic::{Mnemonic, MnemonicError};

    const DOSE_WORDS: &str = "dose ice enrich trigger test dove century still betray gas diet dune use other base gym mad law immense village world example praise game";
    const PASSWORD_WORDS: &str = "sudden example trigger fancy major enrich gas penalty rib law diet media village total property mandate trial gym test immense base hello vicious tragic";

    #[test]
    fn mnemonic_parse_works() -> anyhow::Result<()> {
        assert!(Mnemonic::from_str(DOSE_WORDS, &None).is_ok());

        let words = " dose ice enrich trigger test dove \
        century still betray gas diet       dune use other base gym mad law \
        immense village world example praise game ";
        assert!(Mnemonic::from_str(words, &None).is_ok());

        let upper = DOSE_WORDS.to_uppercase();
        assert!(Mnemonic::from_str(&upper, &None).is_ok());
        Ok(())
    }

    #[test]
    fn mnemonic_validate_works() {
        let mnemonic = Mnemonic::new(
            vec![
                "dose", "ice", "enrich", "trigger", "test", "dove", "century", "still", "betray",
                "gas", "diet", "dune",
            ],
            &None,
        );
        assert!(matches!(mnemonic, Err(MnemonicError::UnexpectedWordCount(12))));

        let with_typo = DOSE_WORDS.replace("dose", "doze");
        assert!(matches!(
            Mnemonic::from_str(&with_typo, &None),
            Err(MnemonicError::InvalidWord(w)) if w == "doze"
        ));

        let all_abandon = vec!["abandon"; 24];
        assert!(matches!(
            Mnemonic::new(all_abandon, &None),
            Err(MnemonicError::InvalidPasswordlessMnemonicFirstByte(_))
        ));
    }

    #[test]
    fn mnemonic_to_private_key_works() -> anyhow::Result<()> {
        let mnemonic = Mnemonic::from_str(DOSE_WORDS, &None)?;
        let expected = "119dcf2840a3d56521d260b2f125eedc0d4f3795b9e627269a4b5a6dca8257bdc04ad1885c127fe863abb00752fa844e6439bb04f264d70de7cea580b32637ab";

        let kp = mnemonic.to_key_pair()?;
        assert_eq!(hex::encode(&kp.secret_key), expected);
        assert_eq!(kp.public_key, kp.secret_key[32..]);
        Ok(())
    }

    #[test]
    fn mnemonic_with_password_works() -> anyhow::Result<()> {
        let password = Some("secret".to_string());
        assert!(matches!(
            Mnemonic::from_str(PASSWORD_WORDS, &None),
            Err(MnemonicError::InvalidPasswordlessMnemonicFirstByte(_))
        ));
        assert!(matches!(
            Mnemonic::from_str(DOSE_WORDS, &password),
            Err(MnemonicError::InvalidFirstByte(_))
        ));

        let kp = Mnemonic::from_str(PASSWORD_WORDS, &password)?.to_key_pair()?;
        assert_eq!(
            hex::encode(&kp.public_key),
            "da1f86b689a7412ce3275629b3c3755168918a23cf4caee8f8f5b9de8a8c42fc"
        );

        let empty_password = Some(String::new());
        assert!(Mnemonic::from_str(DOSE_WORDS, &empty_password).is_ok());
        Ok(())
    }

    #[test]
    fn key_pair_signs() -> anyhow::Result<()> {
        let kp = Mnemonic::from_str(DOSE_WORDS, &None)?.to_key_pair()?;
        let signature = kp.sign(b"hello")?;
        let public: [u8; 32] = kp.public_key.as_slice().try_into()?;
        VerifyingKey::from_bytes(&public)?.verify(b"hello", &Signature::from_bytes(&signature))?;
        Ok(())
    }

    #[test]
    fn secrets_are_not_printed() -> anyhow::Result<()> {
        let mnemonic = Mnemonic::from_str(DOSE_WORDS, &None)?;
        let kp = mnemonic.to_key_pair()?;
        assert!(!format!("{:?}", mnemonic).contains("dose"));
        assert!(!format!("{:?}", kp).contains("119dcf28"));
        Ok(())
    }
}
