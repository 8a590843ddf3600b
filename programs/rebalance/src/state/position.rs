use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::constants::amm_accounts;
use crate::state::decode_zero_copy;

/// Read-only view of a SuniSwap `Position` account
/// PDA (AMM program): ["position", pool, owner, lower_tick.to_le_bytes(), upper_tick.to_le_bytes()]
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PositionView {
    /// Amount of liquidity in this position
    pub liquidity: u128,                          // 16 bytes, offset 0

    pub fee_growth_inside_a_last_x128: u128,      // 16 bytes, offset 16
    pub fee_growth_inside_b_last_x128: u128,      // 16 bytes, offset 32
    pub tokens_owed_a: u64,                       // 8 bytes, offset 48
    pub tokens_owed_b: u64,                       // 8 bytes, offset 56

    /// Lower tick of the position range
    pub tick_lower: i32,                          // 4 bytes, offset 64

    /// Upper tick of the position range
    pub tick_upper: i32,                          // 4 bytes, offset 68

    pub bump: u8,                                 // 1 byte, offset 72
    pub _padding: [u8; 7],                        // 7 bytes, offset 73

    /// The pool this position belongs to
    pub pool: [u8; 32],                           // 32 bytes, offset 80

    /// Position owner
    pub owner: [u8; 32],                          // 32 bytes, offset 112

    pub position_mint: [u8; 32],                  // 32 bytes, offset 144
    pub _reserved: [u8; 32],                      // 32 bytes, offset 176
}
// Total: 208 bytes

const _: () = assert!(std::mem::size_of::<PositionView>() == 208);

impl PositionView {
    pub const LEN: usize = 8 + std::mem::size_of::<PositionView>();

    pub fn decode(owner: &Pubkey, data: &[u8], amm_program: &Pubkey) -> Result<Self> {
        decode_zero_copy(owner, data, amm_program, amm_accounts::POSITION)
    }

    pub fn load(info: &AccountInfo, amm_program: &Pubkey) -> Result<Self> {
        Self::decode(info.owner, &info.try_borrow_data()?, amm_program)
    }

    pub fn pool_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.pool)
    }

    pub fn owner_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.owner)
    }
}
