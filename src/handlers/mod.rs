pub mod companion;
pub mod session_sweeper;

pub use companion::CompanionHandler;
pub use session_sweeper::SessionSweeper;
