//! Solver capabilities backed by the accounts passed to an instruction

use anchor_lang::prelude::*;

use crate::errors::RebalanceError;
use crate::rebalance::{PoolDirectory, PoolSnapshot, PositionRegistry, ResolvedPosition, TickSet};
use crate::state::{FeeTierView, PoolView, PositionView, TickArrayView};

/// A validated pool account together with its fee tier
#[derive(Clone, Copy, Debug)]
pub struct PoolAccounts {
    pub key: Pubkey,
    pub pool: PoolView,
    pub fee_tier: FeeTierView,
}

impl PoolAccounts {
    /// Pair a pool with its fee tier, rejecting paused or mismatched pools
    pub fn new(key: Pubkey, pool: PoolView, fee_tier_key: Pubkey, fee_tier: FeeTierView) -> Result<Self> {
        require!(!pool.is_pool_paused(), RebalanceError::PoolPaused);
        require_keys_eq!(pool.fee_tier_pubkey(), fee_tier_key, RebalanceError::InvalidFeeTier);
        require!(
            pool.tick_spacing == fee_tier.tick_spacing,
            RebalanceError::InvalidFeeTier
        );
        Ok(Self { key, pool, fee_tier })
    }

    pub fn load(pool_info: &AccountInfo, fee_tier_info: &AccountInfo, amm_program: &Pubkey) -> Result<Self> {
        Self::new(
            pool_info.key(),
            PoolView::load(pool_info, amm_program)?,
            fee_tier_info.key(),
            FeeTierView::load(fee_tier_info, amm_program)?,
        )
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        self.pool.snapshot(self.fee_tier.fee_rate)
    }

    /// Initialized ticks around the current price from this pool's tick arrays
    pub fn tick_set(&self, arrays: &[TickArrayView]) -> Result<TickSet> {
        for array in arrays {
            require_keys_eq!(array.pool_pubkey(), self.key, RebalanceError::InvalidTickArray);
        }
        TickSet::from_tick_arrays(arrays, self.pool.tick_spacing, self.pool.tick_current)
    }

    pub fn load_tick_set(&self, infos: &[AccountInfo], amm_program: &Pubkey) -> Result<TickSet> {
        let arrays = infos
            .iter()
            .map(|info| TickArrayView::load(info, amm_program))
            .collect::<Result<Vec<_>>>()?;
        self.tick_set(&arrays)
    }
}

/// Position registry and pool directory over one position and its pool
#[derive(Clone, Copy, Debug)]
pub struct AccountRegistry {
    pub position_key: Pubkey,
    pub position: PositionView,
    pub pool: PoolAccounts,
}

impl AccountRegistry {
    pub fn new(position_key: Pubkey, position: PositionView, pool: PoolAccounts) -> Result<Self> {
        require_keys_eq!(position.pool_pubkey(), pool.key, RebalanceError::PositionPoolMismatch);
        Ok(Self {
            position_key,
            position,
            pool,
        })
    }
}

impl PositionRegistry for AccountRegistry {
    fn resolve_position(&self, position_id: &Pubkey) -> Result<ResolvedPosition> {
        require_keys_eq!(*position_id, self.position_key, RebalanceError::PositionNotFound);
        Ok(ResolvedPosition {
            tick_lower: self.position.tick_lower,
            tick_upper: self.position.tick_upper,
            fee_rate: self.pool.fee_tier.fee_rate,
            token_a: self.pool.pool.token_mint_a_pubkey(),
            token_b: self.pool.pool.token_mint_b_pubkey(),
        })
    }
}

impl PoolDirectory for AccountRegistry {
    fn pool(&self, token_a: &Pubkey, token_b: &Pubkey, fee_rate: u32) -> Result<PoolSnapshot> {
        let snapshot = self.pool.snapshot();
        require!(
            snapshot.token_mint_a == *token_a
                && snapshot.token_mint_b == *token_b
                && snapshot.fee_rate == fee_rate,
            RebalanceError::PoolNotFound
        );
        Ok(snapshot)
    }
}
