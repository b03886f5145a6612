pub mod custody;
pub mod stable_coin;

pub use custody::*;
pub use stable_coin::*;
