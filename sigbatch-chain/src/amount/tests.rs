//! Tests for amounts
