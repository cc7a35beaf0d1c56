//! Keystore password generation

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Default length of generated store and key passwords
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Generate a random `[A-Za-z0-9]` password from the OS CSPRNG
pub fn generate_password(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
