use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated article ids.
pub const ID_LEN: usize = 8;

/// Generate a random id of [`ID_LEN`] characters from `[a-zA-Z0-9]`.
///
/// Draws from the thread-local RNG, which is seeded once per thread.
/// Uniqueness is up to the caller.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Whether `id` has the shape produced by [`generate`].
pub fn is_valid(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
