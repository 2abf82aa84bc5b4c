pub mod dump;
pub mod info;
pub mod validate;

pub use dump::run as dump;
pub use info::run as info;
pub use validate::run as validate;
