//! Integration test modules.

mod authorization_test;
mod config_test;
