//! Integration tests for certdesigner.
//!
//! These drive the editor session and the export pipeline end-to-end.

mod gesture_sequence_tests;
mod interaction_tests;
