//! Digibank server library: the HTTP API, shared by the `dbank` binary and tests

pub mod http;
