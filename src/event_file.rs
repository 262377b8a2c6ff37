pub mod advance;
pub mod event_detail;
pub mod game;
pub mod modifier;
pub mod parser;
pub mod play;
pub mod roster;
pub mod schemas;
pub mod traits;
