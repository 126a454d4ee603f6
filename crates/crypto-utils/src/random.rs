use rand_core::RngCore;

use crate::error::CryptoError;

/// Fills `buf` from `rng`, surfacing source failures instead of panicking.
pub fn try_fill<R: RngCore + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<(), CryptoError> {
    rng.try_fill_bytes(buf)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))
}

/// Draws a fixed-size array of random bytes from `rng`.
pub fn random_bytes_fixed_from<R: RngCore + ?Sized, const N: usize>(
    rng: &mut R,
) -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    try_fill(rng, &mut buf)?;
    Ok(buf)
}
