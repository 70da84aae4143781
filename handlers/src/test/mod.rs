//! Unit test module
//!
//! Handler unit tests live here, separate from source files.
//! Tests drive the pipeline through a recording [`Transport`](vnote_core::Transport) mock.

mod classifier_test;
