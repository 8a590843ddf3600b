use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::constants::amm_accounts;
use crate::rebalance::PoolSnapshot;
use crate::state::decode_zero_copy;

/// Read-only view of a SuniSwap `Pool` account
/// PDA (AMM program): ["pool", token_mint_a, token_mint_b, fee_rate.to_le_bytes()]
///
/// Byte-for-byte the AMM's zero-copy layout; only the price, liquidity and
/// identity fields are used here.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PoolView {
    /// Current sqrt price as Q64.64 fixed point
    pub sqrt_price_x64: u128,                     // 16 bytes, offset 0

    /// Total liquidity currently in range
    pub liquidity: u128,                          // 16 bytes, offset 16

    pub fee_growth_global_a_x128: u128,           // 16 bytes, offset 32
    pub fee_growth_global_b_x128: u128,           // 16 bytes, offset 48
    pub protocol_fees_a: u64,                     // 8 bytes, offset 64
    pub protocol_fees_b: u64,                     // 8 bytes, offset 72

    /// Current tick index
    pub tick_current: i32,                        // 4 bytes, offset 80

    /// Tick spacing for this pool
    pub tick_spacing: u16,                        // 2 bytes, offset 84

    pub observation_index: u16,                   // 2 bytes, offset 86
    pub observation_cardinality: u16,             // 2 bytes, offset 88
    pub observation_cardinality_next: u16,        // 2 bytes, offset 90
    pub protocol_fee_rate: u8,                    // 1 byte, offset 92

    /// Whether the pool is paused
    pub is_paused: u8,                            // 1 byte, offset 93

    pub bump: u8,                                 // 1 byte, offset 94
    pub hook_flags: u8,                           // 1 byte, offset 95
    pub config: [u8; 32],                         // 32 bytes, offset 96

    /// Token A mint
    pub token_mint_a: [u8; 32],                   // 32 bytes, offset 128

    /// Token B mint
    pub token_mint_b: [u8; 32],                   // 32 bytes, offset 160

    pub token_vault_a: [u8; 32],                  // 32 bytes, offset 192
    pub token_vault_b: [u8; 32],                  // 32 bytes, offset 224

    /// Fee tier for this pool
    pub fee_tier: [u8; 32],                       // 32 bytes, offset 256

    pub hook_program: [u8; 32],                   // 32 bytes, offset 288
    pub oracle: [u8; 32],                         // 32 bytes, offset 320
    pub _reserved: [u8; 32],                      // 32 bytes, offset 352
}
// Total: 384 bytes

const _: () = assert!(std::mem::size_of::<PoolView>() == 384);

impl PoolView {
    pub const LEN: usize = 8 + std::mem::size_of::<PoolView>();

    /// Decode from raw account bytes owned by `amm_program`
    pub fn decode(owner: &Pubkey, data: &[u8], amm_program: &Pubkey) -> Result<Self> {
        decode_zero_copy(owner, data, amm_program, amm_accounts::POOL)
    }

    pub fn load(info: &AccountInfo, amm_program: &Pubkey) -> Result<Self> {
        Self::decode(info.owner, &info.try_borrow_data()?, amm_program)
    }

    pub fn token_mint_a_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.token_mint_a)
    }

    pub fn token_mint_b_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.token_mint_b)
    }

    pub fn fee_tier_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.fee_tier)
    }

    pub fn is_pool_paused(&self) -> bool {
        self.is_paused != 0
    }

    /// Price state for the solver; the fee rate lives on the fee tier
    pub fn snapshot(&self, fee_rate: u32) -> PoolSnapshot {
        PoolSnapshot {
            token_mint_a: self.token_mint_a_pubkey(),
            token_mint_b: self.token_mint_b_pubkey(),
            fee_rate,
            tick_spacing: self.tick_spacing,
            sqrt_price_x64: self.sqrt_price_x64,
            tick_current: self.tick_current,
            liquidity: self.liquidity,
        }
    }
}
