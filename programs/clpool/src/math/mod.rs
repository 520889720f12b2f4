pub mod u256;
pub mod bit_math;
pub mod full_math;
pub mod tick_math;
pub mod sqrt_price_math;
pub mod liquidity_math;
pub mod swap_math;

pub use u256::{U256, U512};
pub use bit_math::*;
pub use full_math::*;
pub use tick_math::*;
pub use sqrt_price_math::*;
pub use liquidity_math::*;
pub use swap_math::*;
