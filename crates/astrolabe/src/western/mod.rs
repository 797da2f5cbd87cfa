pub mod dignities;
pub mod rulers;
pub mod types;

pub use dignities::{classify, dignity_of, Dignity, DignityResult};
pub use rulers::{domiciles, sign_ruler};
pub use types::BodyPlacement;
