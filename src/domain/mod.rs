pub mod intent;
pub mod money;
pub mod ports;
pub mod pricing;
pub mod wire;
