pub mod adapter;
pub mod backend;
pub mod handle;
pub mod solar;
pub mod speed;
pub mod types;

pub use adapter::SwissEphemerisAdapter;
pub use backend::{Ephemeris, EphemerisError};
pub use handle::EphemerisHandle;
pub use speed::FiniteDifferenceSpeed;
pub use types::{Body, HouseSystem, Location, RawHouses, RawPosition, SolarDay};
