/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod filesystem;
pub mod network;
pub mod process;
pub mod storage;
