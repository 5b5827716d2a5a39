pub mod model;
pub mod server;

pub use model::BridgeState;
pub use server::FeatureBridge;
