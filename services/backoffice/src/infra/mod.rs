pub mod functions;
pub mod gotrue;
pub mod rest;
pub mod sessions;
