//! Tests for signature validation passes.

#![allow(clippy::unwrap_in_result)]

mod prop;
