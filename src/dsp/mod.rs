//! # DSP (Digital Signal Processing) Primitives
//!
//! - **`delay_line`**: [`DelayLineFilter`](delay_line::DelayLineFilter), a
//!   feedforward comb filter over a ring buffer whose length (the order)
//!   and gain can be changed while audio is running.
//!
//! - **`bank`**: [`FilterBank`](bank::FilterBank), one filter per channel
//!   with room reserved up front, so the order can change between audio
//!   blocks without allocating.
//!
//! - **`error`**: the ways configuring or running that filter can fail.

pub mod bank;
pub mod delay_line;
pub mod error;
