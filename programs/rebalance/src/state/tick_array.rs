use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::constants::{amm_accounts, TICK_ARRAY_SIZE};
use crate::rebalance::InitializedTick;
use crate::state::decode_zero_copy;

const _: () = assert!(TICK_ARRAY_SIZE <= 8, "TICK_ARRAY_SIZE exceeds bitmap capacity (8 bits)");

/// One tick slot inside a tick array
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct TickView {
    /// Net liquidity change when the price crosses this tick upwards
    pub liquidity_net: i128,                      // 16 bytes, offset 0

    pub liquidity_gross: u128,                    // 16 bytes, offset 16
    pub fee_growth_outside_a_x128: u128,          // 16 bytes, offset 32
    pub fee_growth_outside_b_x128: u128,          // 16 bytes, offset 48
    pub seconds_per_liquidity_outside_x64: u128,  // 16 bytes, offset 64
    pub tick_cumulative_outside: i64,             // 8 bytes, offset 80
    pub seconds_outside: u32,                     // 4 bytes, offset 88
    pub initialized: u8,                          // 1 byte, offset 92
    pub _padding: [u8; 3],                        // 3 bytes, offset 93
}
// Total: 96 bytes

const _: () = assert!(std::mem::size_of::<TickView>() == 96);

/// Read-only view of a SuniSwap `TickArray` account
/// PDA (AMM program): ["tick_array", pool, start_tick_index.to_le_bytes()]
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TickArrayView {
    /// The pool this tick array belongs to
    pub pool: [u8; 32],                           // 32 bytes, offset 0

    /// Starting tick index, a multiple of TICK_ARRAY_SIZE * tick_spacing
    pub start_tick_index: i32,                    // 4 bytes, offset 32

    /// Bit i set when ticks[i] is initialized
    pub initialized_bitmap: u8,                   // 1 byte, offset 36

    pub bump: u8,                                 // 1 byte, offset 37
    pub _padding: [u8; 10],                       // 10 bytes, offset 38
    pub ticks: [TickView; TICK_ARRAY_SIZE],       // 768 bytes, offset 48
}
// Total: 816 bytes

const _: () = assert!(std::mem::size_of::<TickArrayView>() == 816);

impl TickArrayView {
    pub const LEN: usize = 8 + std::mem::size_of::<TickArrayView>();

    pub fn decode(owner: &Pubkey, data: &[u8], amm_program: &Pubkey) -> Result<Self> {
        decode_zero_copy(owner, data, amm_program, amm_accounts::TICK_ARRAY)
    }

    pub fn load(info: &AccountInfo, amm_program: &Pubkey) -> Result<Self> {
        Self::decode(info.owner, &info.try_borrow_data()?, amm_program)
    }

    pub fn pool_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.pool)
    }

    /// Empty array starting at `start_tick_index`
    pub fn zeroed_at(start_tick_index: i32) -> Self {
        Self {
            start_tick_index,
            ..Self::zeroed()
        }
    }

    /// Initialized ticks of this array, lowest first
    pub fn initialized_ticks(&self, tick_spacing: u16) -> impl Iterator<Item = InitializedTick> + '_ {
        let start = self.start_tick_index;
        (0..TICK_ARRAY_SIZE)
            .filter(move |&offset| (self.initialized_bitmap >> offset) & 1 == 1)
            .map(move |offset| InitializedTick {
                index: start + offset as i32 * tick_spacing as i32,
                liquidity_net: self.ticks[offset].liquidity_net,
            })
    }
}
