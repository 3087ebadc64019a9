pub mod types;

pub use types::{AutomationLevel, DesignState, FulfilmentLogic, StorageModel};
