//! Tests for the signature checkers.

#![allow(clippy::unwrap_in_result)]
