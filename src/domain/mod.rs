mod account;
mod audit;
mod fees;
mod money;
mod transfer;

pub use account::*;
pub use audit::*;
pub use fees::*;
pub use money::*;
pub use transfer::*;
