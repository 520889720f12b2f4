//! Pool operations, one file each
//!
//! Every file adds methods to `Pool`. Mutating operations run inside
//! `Pool::with_lock`; the views in `observe` read state directly.

pub mod burn;
pub mod collect;
pub mod collect_protocol;
pub mod flash;
pub mod increase_observation_cardinality_next;
pub mod initialize;
pub mod mint;
pub mod modify_position;
pub mod observe;
pub mod set_fee_protocol;
pub mod swap;
