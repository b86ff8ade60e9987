//! Password Hashing and Verification
//!
//! - Argon2id hashing with a per-call random salt (PHC string output)
//! - Work parameters fixed by a [`HashingPolicy`] chosen at construction
//! - Zeroization of clear text passwords
//! - Constant-time comparison (inside the Argon2 primitive)
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - Zeroization prevents memory inspection attacks
//! - [`PasswordHasher::verify_dummy`] lets callers spend the same effort on
//!   unknown accounts as on real ones

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random_bytes;

// ============================================================================
// Constants (OWASP Argon2id baseline)
// ============================================================================

/// Default memory cost in KiB (19 MiB)
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;

/// Default iteration count (time cost)
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Default degree of parallelism
pub const DEFAULT_PARALLELISM: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The password does not re-derive the stored hash
    #[error("Password does not match")]
    Mismatch,

    /// Stored hash is not a parseable PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Work parameters rejected by Argon2
    #[error("Invalid hashing policy: {0}")]
    InvalidPolicy(String),
}

// ============================================================================
// Hashing Policy
// ============================================================================

/// Argon2id work parameters
///
/// `iterations` is the cost factor. None of these values are secret; they are
/// embedded in every PHC string produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingPolicy {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingPolicy {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl HashingPolicy {
    fn params(&self) -> Result<Params, PasswordHashError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidPolicy(e.to_string()))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// No policy is enforced here: an empty string is a valid (if useless)
/// password. The bytes are hashed exactly as given; no Unicode
/// normalization is applied.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// Algorithm, version, parameters and salt are all embedded, so a hash
/// produced under an older [`HashingPolicy`] still verifies.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored value without parsing it.
    ///
    /// A corrupt value surfaces as [`PasswordHashError::InvalidHashFormat`]
    /// on verification rather than at load time.
    pub fn from_db(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id hasher bound to one [`HashingPolicy`]
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy: HashedPassword,
}

impl PasswordHasher {
    /// Build a hasher and precompute the dummy hash used by
    /// [`verify_dummy`](Self::verify_dummy).
    pub fn new(policy: HashingPolicy) -> Result<Self, PasswordHashError> {
        let params = policy.params()?;
        let placeholder = HashedPassword::from_db(String::new());
        let mut hasher = Self {
            params,
            dummy: placeholder,
        };

        let filler = ClearTextPassword(hex_encode(&random_bytes(32)));
        hasher.dummy = hasher.hash(&filler)?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash the password with a fresh random salt.
    ///
    /// Hashing the same password twice yields different PHC strings.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison is always delegated to Argon2, which compares in
    /// constant time; parameters are read from the hash itself.
    pub fn verify(
        &self,
        hashed: &HashedPassword,
        password: &ClearTextPassword,
    ) -> Result<(), PasswordHashError> {
        let parsed =
            PasswordHash::new(&hashed.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(PasswordHashError::Mismatch),
            Err(_) => Err(PasswordHashError::InvalidHashFormat),
        }
    }

    /// Spend one verification's worth of work and discard the outcome.
    pub fn verify_dummy(&self, password: &ClearTextPassword) {
        let _ = self.verify(&self.dummy, password);
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ============================================================================
// Tests
// ============================================================================
