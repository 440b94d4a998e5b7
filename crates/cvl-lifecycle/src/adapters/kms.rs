//! Simulated key management / coprocessor
//!
//! Stands in for the threshold decryption network behind a homomorphic
//! ledger. Values are masked with a Keccak keystream and every proof is a
//! keyed Keccak digest, so proofs are bound to the contract, the identity
//! and the exact bytes they cover. This is a test double for the protocol,
//! not a cryptosystem.

use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use shared_types::{
    encode_clear_values, Ciphertext, ConfidentialHandle, ContractAddress, CryptoError,
    DecryptionProof, DecryptionResult, EncryptedInput, Hash, Identity, InputProof,
};
use std::collections::HashMap;

const NONCE_LEN: usize = 16;
const CIPHERTEXT_LEN: usize = NONCE_LEN + 4;

pub struct SimulatedKms {
    key: Hash,
    /// Ciphertexts the ledger has accepted, by handle
    ciphertexts: RwLock<HashMap<ConfidentialHandle, Ciphertext>>,
}

impl SimulatedKms {
    pub fn new(key: Hash) -> Self {
        Self {
            key,
            ciphertexts: RwLock::new(HashMap::new()),
        }
    }

    /// KMS with a fresh random key.
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    /// Encrypt `value` for `identity` under `context`, with an input proof.
    pub fn encrypt(
        &self,
        context: ContractAddress,
        identity: Identity,
        value: u32,
    ) -> EncryptedInput {
        let nonce: [u8; NONCE_LEN] = rand::random();
        let mask = self.keystream(&nonce);

        let mut bytes = Vec::with_capacity(CIPHERTEXT_LEN);
        bytes.extend_from_slice(&nonce);
        bytes.extend(
            value
                .to_be_bytes()
                .iter()
                .zip(mask.iter())
                .map(|(v, m)| v ^ m),
        );
        let ciphertext = Ciphertext(bytes);
        let input_proof = InputProof(self.input_tag(context, identity, &ciphertext).to_vec());

        EncryptedInput {
            ciphertext,
            input_proof,
        }
    }

    /// Check that `encrypted` was produced for `identity` under `context`.
    pub fn verify_input(
        &self,
        context: ContractAddress,
        identity: Identity,
        encrypted: &EncryptedInput,
    ) -> bool {
        encrypted.ciphertext.0.len() == CIPHERTEXT_LEN
            && encrypted.input_proof.0 == self.input_tag(context, identity, &encrypted.ciphertext)
    }

    /// Handle under which the ledger stores a ciphertext.
    pub fn handle_for(&self, ciphertext: &Ciphertext) -> ConfidentialHandle {
        let mut hasher = Keccak256::new();
        hasher.update(b"cvl-handle");
        hasher.update(&ciphertext.0);
        ConfidentialHandle(hasher.finalize().into())
    }

    /// Make a stored ciphertext available for public decryption.
    pub fn register(&self, handle: ConfidentialHandle, ciphertext: Ciphertext) {
        self.ciphertexts.write().insert(handle, ciphertext);
    }

    /// Decrypt `handles` and prove the result for `context`.
    pub fn public_decrypt(
        &self,
        context: ContractAddress,
        handles: &[ConfidentialHandle],
    ) -> Result<DecryptionResult, CryptoError> {
        if handles.is_empty() {
            return Err(CryptoError::DecryptionFailed("no handles requested".into()));
        }

        let mut values = Vec::with_capacity(handles.len());
        {
            let ciphertexts = self.ciphertexts.read();
            for handle in handles {
                let ciphertext = ciphertexts
                    .get(handle)
                    .ok_or(CryptoError::UnknownHandle(*handle))?;
                values.push(self.unmask(ciphertext)?);
            }
        }

        let abi_encoded_clear_values = encode_clear_values(&values);
        let proof = DecryptionProof(
            self.decryption_tag(context, handles, &abi_encoded_clear_values)
                .to_vec(),
        );

        Ok(DecryptionResult {
            clear_values: handles.iter().copied().zip(values).collect(),
            abi_encoded_clear_values,
            proof,
        })
    }

    /// Check a decryption proof as the verification entry point would.
    pub fn verify_decryption(
        &self,
        context: ContractAddress,
        handles: &[ConfidentialHandle],
        abi_encoded_clear_values: &[u8],
        proof: &DecryptionProof,
    ) -> bool {
        proof.0 == self.decryption_tag(context, handles, abi_encoded_clear_values)
    }

    fn unmask(&self, ciphertext: &Ciphertext) -> Result<u32, CryptoError> {
        if ciphertext.0.len() != CIPHERTEXT_LEN {
            return Err(CryptoError::DecryptionFailed(format!(
                "malformed ciphertext of {} bytes",
                ciphertext.0.len()
            )));
        }
        let (nonce, masked) = ciphertext.0.split_at(NONCE_LEN);
        let mask = self.keystream(nonce);
        let mut value = [0u8; 4];
        for (i, byte) in value.iter_mut().enumerate() {
            *byte = masked[i] ^ mask[i];
        }
        Ok(u32::from_be_bytes(value))
    }

    fn keystream(&self, nonce: &[u8]) -> Hash {
        self.tag(&[b"cvl-mask", nonce])
    }

    fn input_tag(
        &self,
        context: ContractAddress,
        identity: Identity,
        ciphertext: &Ciphertext,
    ) -> Hash {
        self.tag(&[b"cvl-input", &context.0, &identity.0, &ciphertext.0])
    }

    fn decryption_tag(
        &self,
        context: ContractAddress,
        handles: &[ConfidentialHandle],
        abi_encoded_clear_values: &[u8],
    ) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(self.key);
        hasher.update(b"cvl-decrypt");
        hasher.update(context.0);
        for handle in handles {
            hasher.update(handle.0);
        }
        hasher.update(abi_encoded_clear_values);
        hasher.finalize().into()
    }

    fn tag(&self, parts: &[&[u8]]) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(self.key);
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}
