pub mod config;
pub mod oracle;
pub mod pool;
pub mod position;
pub mod tick;
pub mod tick_bitmap;

pub use config::*;
pub use oracle::*;
pub use pool::*;
pub use position::*;
pub use tick::*;
pub use tick_bitmap::TickBitmap;
