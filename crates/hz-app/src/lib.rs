//! Animation sequencing and process plumbing for the `hozumi` binary.
//!
//! The sequencer is written against the [`sequencer::Stage`] trait so the
//! same reveal logic drives the scrolling stream, the fixed grid and the
//! parallel lanes.
pub mod app;
pub mod cli;
pub mod dance;
pub mod fanout;
pub mod sequencer;
pub mod shutdown;

#[cfg(test)]
pub(crate) mod testing;
