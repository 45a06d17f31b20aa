//! FFI crate bridging `workhub_core` to the mobile shell.

pub mod api;
