//! Execution layer tests

mod helpers;
mod vm_tests;
