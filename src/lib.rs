pub mod cli;
pub mod config;
pub mod global;
pub mod history;
pub mod live;
pub mod normalizer;
pub mod render;
pub mod store;
pub mod trail;
pub mod window;
