use std::fmt;
use std::io::Read;
use std::sync::OnceLock;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use ring::digest;
use ring::rand::SystemRandom;
use tracing::debug;

use super::errors::{DnsSecError, Result};

/// Seeded random source used for key generation.
///
/// `ring` only accepts its own generators, so operations that need
/// randomness inside `ring` (ECDSA nonces, RSA blinding, PKCS#8 generation)
/// draw from the system generator kept alongside the seeded one.
pub struct RandomContext {
    rng: Mutex<StdRng>,
    system: SystemRandom,
}

impl RandomContext {
    /// Reads exactly `bytes` bytes of seed material from `reader`
    pub fn from_entropy<R: Read>(mut reader: R, bytes: u16) -> Result<Self> {
        if bytes == 0 {
            return Err(DnsSecError::EntropyReadFailure(
                "seed length must be non-zero".to_string(),
            ));
        }
        let mut material = vec![0u8; usize::from(bytes)];
        reader.read_exact(&mut material).map_err(|e| {
            DnsSecError::EntropyReadFailure(format!("reading {bytes} bytes: {e}"))
        })?;

        let mut seed = [0u8; 32];
        seed.copy_from_slice(digest::digest(&digest::SHA256, &material).as_ref());
        debug!("Seeded random context from {} bytes of entropy", bytes);

        Ok(Self {
            rng: Mutex::new(StdRng::from_seed(seed)),
            system: SystemRandom::new(),
        })
    }

    pub fn fill(&self, dest: &mut [u8]) {
        self.rng.lock().fill_bytes(dest);
    }

    pub(crate) fn system(&self) -> &SystemRandom {
        &self.system
    }
}

impl fmt::Debug for RandomContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomContext").finish_non_exhaustive()
    }
}

static GLOBAL: OnceLock<RandomContext> = OnceLock::new();

/// Initialize the process-wide random source. Fails on a second call.
pub fn init<R: Read>(reader: R, bytes: u16) -> Result<&'static RandomContext> {
    if GLOBAL.get().is_some() {
        return Err(DnsSecError::AlreadyInitialized);
    }
    let context = RandomContext::from_entropy(reader, bytes)?;
    GLOBAL
        .set(context)
        .map_err(|_| DnsSecError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(DnsSecError::AlreadyInitialized)
}

pub fn global() -> Option<&'static RandomContext> {
    GLOBAL.get()
}
