//! # convergence-tests
//!
//! Multi-client convergence harness for Quill.
//!
//! This crate wires real [`CollabClient`](edit_client::CollabClient)s to a
//! real [`Reconciler`](edit_server::Reconciler) and checks that every
//! replica ends up with the server's documents:
//! - In-process loopback transport with fault injection
//! - Concurrent edit scenarios from the protocol description
//! - Property tests over arbitrary interleavings
//! - The same scenarios over HTTP against a bound server

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod harness;

#[cfg(test)]
mod scenarios;
