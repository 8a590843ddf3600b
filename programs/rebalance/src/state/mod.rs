pub mod config;
pub mod fee_tier;
pub mod pool;
pub mod position;
pub mod registry;
pub mod tick_array;

pub use config::*;
pub use fee_tier::*;
pub use pool::*;
pub use position::*;
pub use registry::*;
pub use tick_array::*;

use crate::errors::RebalanceError;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use bytemuck::Pod;

/// Anchor account discriminator: first 8 bytes of sha256("account:<Name>")
pub fn account_discriminator(account_name: &str) -> [u8; 8] {
    let digest = hash(format!("account:{account_name}").as_bytes()).to_bytes();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

/// Check owner and discriminator of a foreign Anchor account, returning its body
pub fn account_body<'a>(
    owner: &Pubkey,
    data: &'a [u8],
    expected_owner: &Pubkey,
    account_name: &str,
) -> Result<&'a [u8]> {
    require_keys_eq!(*owner, *expected_owner, RebalanceError::InvalidAccountOwner);
    require!(data.len() >= 8, RebalanceError::InvalidAccountData);
    require!(
        data[..8] == account_discriminator(account_name),
        RebalanceError::InvalidAccountData
    );
    Ok(&data[8..])
}

/// Copy a zero-copy account out of its raw bytes
///
/// The data buffer carries no alignment guarantee, so the body is read
/// unaligned into an owned value.
pub fn decode_zero_copy<T: Pod>(
    owner: &Pubkey,
    data: &[u8],
    expected_owner: &Pubkey,
    account_name: &str,
) -> Result<T> {
    let body = account_body(owner, data, expected_owner, account_name)?;
    let size = std::mem::size_of::<T>();
    require!(body.len() >= size, RebalanceError::InvalidAccountData);
    bytemuck::try_pod_read_unaligned(&body[..size])
        .map_err(|_| RebalanceError::InvalidAccountData.into())
}

/// Serialize a zero-copy value the way the AMM stores it
#[cfg(test)]
pub(crate) fn encode_zero_copy<T: Pod>(value: &T, account_name: &str) -> Vec<u8> {
    let mut data = account_discriminator(account_name).to_vec();
    data.extend_from_slice(bytemuck::bytes_of(value));
    data
}
