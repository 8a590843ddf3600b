use anchor_lang::prelude::*;

use crate::constants::{amm_accounts, FEE_RATE_DENOMINATOR};
use crate::errors::RebalanceError;
use crate::state::account_body;

/// Read-only view of a SuniSwap `FeeTier` account (Borsh encoded)
/// PDA (AMM program): ["fee_tier", fee_rate.to_le_bytes()]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeTierView {
    /// The AMM config this fee tier belongs to
    pub config: Pubkey,

    /// Fee rate in hundredths of a basis point (100 = 0.01%)
    pub fee_rate: u32,

    /// Tick spacing for this fee tier
    pub tick_spacing: u16,

    pub bump: u8,
    pub _reserved: [u8; 32],
}

impl FeeTierView {
    pub const LEN: usize = 8 +  // discriminator
        32 +                     // config
        4 +                      // fee_rate
        2 +                      // tick_spacing
        1 +                      // bump
        32;                      // reserved

    pub fn decode(owner: &Pubkey, data: &[u8], amm_program: &Pubkey) -> Result<Self> {
        let mut body = account_body(owner, data, amm_program, amm_accounts::FEE_TIER)?;
        let fee_tier = Self::deserialize(&mut body)
            .map_err(|_| error!(RebalanceError::InvalidAccountData))?;
        require!(
            fee_tier.fee_rate < FEE_RATE_DENOMINATOR && fee_tier.tick_spacing > 0,
            RebalanceError::InvalidFeeTier
        );
        Ok(fee_tier)
    }

    pub fn load(info: &AccountInfo, amm_program: &Pubkey) -> Result<Self> {
        Self::decode(info.owner, &info.try_borrow_data()?, amm_program)
    }
}
