pub mod commit;
pub mod log;
pub mod status;

pub use self::commit::*;
pub use self::log::*;
pub use self::status::*;
