pub mod entry;
pub mod error;
pub mod proto;
pub mod store;

pub mod elastic;
pub mod memory;

pub mod config;
pub mod env;
pub mod handler;
pub mod init;
pub mod server;
