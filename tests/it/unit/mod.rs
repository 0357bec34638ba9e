//! Unit tests for certdesigner.

mod config_tests;
mod geometry_tests;
mod image_store_tests;
mod snapshot_tests;
mod template_model_tests;
