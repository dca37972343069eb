// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Elevator controller firmware entry point.
//!
//! The board bring-up lives in [`firmware`] and is only built for the bare-metal target; on the host
//! this binary is an empty stub so that `cargo test` can build the package.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware;

#[cfg(not(target_os = "none"))]
fn main() {}
