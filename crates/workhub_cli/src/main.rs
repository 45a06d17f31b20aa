//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `workhub_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from Flutter/FFI runtime setup.
    println!("workhub_core ping={}", workhub_core::ping());
    println!("workhub_core version={}", workhub_core::core_version());
    for entry in workhub_core::hub_entries() {
        println!("hub entry id={} title={}", entry.id, entry.title);
    }
}
