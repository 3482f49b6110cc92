pub mod cache;
pub mod feed;
pub mod live;
pub mod search;
