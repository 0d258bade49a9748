pub mod regenerate_sboms;

pub use regenerate_sboms::{RegenerateSbomsUseCase, RunState};
