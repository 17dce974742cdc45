//! Runtime layer tests
