pub mod fully_connected;
pub mod traits;

pub use fully_connected::FullyConnected;
pub use traits::{Layer, OutputInfo, Phase};
