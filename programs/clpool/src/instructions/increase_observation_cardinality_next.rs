use crate::errors::Result;
use crate::events::PoolEvent;
use crate::ledger::TokenLedger;
use crate::state::pool::Pool;

impl<L: TokenLedger + Clone> Pool<L> {
    /// Grow the oracle ring so it can hold at least `observation_cardinality_next` entries
    ///
    /// The new slots become live one at a time as the ring wraps. Smaller
    /// values are a no-op.
    pub fn increase_observation_cardinality_next(
        &mut self,
        observation_cardinality_next: u16,
    ) -> Result<()> {
        self.with_lock("increase_observation_cardinality_next", |pool| {
            let observation_cardinality_next_old = pool.state.oracle.observation_cardinality_next;
            let observation_cardinality_next_new =
                pool.state.oracle.grow(observation_cardinality_next)?;
            if observation_cardinality_next_old != observation_cardinality_next_new {
                pool.emit(PoolEvent::IncreaseObservationCardinalityNext {
                    observation_cardinality_next_old,
                    observation_cardinality_next_new,
                });
            }
            Ok(())
        })
    }
}
