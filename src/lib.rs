//! Web front end for an HLS broadcast-capture daemon — channel status page and playlist.

pub mod channels;
pub mod cli;
pub mod config;
pub mod http;
