//! Tests for signature cache entries and the in-memory cache

mod vectors;
