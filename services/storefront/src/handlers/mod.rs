pub mod hooks;
pub mod live;
pub mod search;
