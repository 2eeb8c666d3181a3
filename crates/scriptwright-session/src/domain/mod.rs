//! Session state and its atomic transitions.

pub mod session;
