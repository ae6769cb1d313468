pub mod editor;
pub mod poller;
pub mod traits;
