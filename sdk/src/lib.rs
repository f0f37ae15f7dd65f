//! Election SDK - client-side interface to the election program
//!
//! This SDK provides:
//! - Schema-driven record encoding
//! - Instruction building for the election program's opcodes
//! - Election account decoding
//! - Session bootstrap (funded payer) and transaction submission

pub mod bootstrap;
pub mod config;
pub mod connection;
pub mod error;
pub mod instruction;
pub mod schema;
pub mod state;
pub mod submitter;

// Re-export key types
pub use bootstrap::Session;
pub use config::ElectionConfig;
pub use connection::{LedgerConnection, RpcConnection};
pub use error::{ElectionClientError, Rejection, Result};
pub use instruction::{ElectionCreationRecord, ElectionInstruction, ElectionOpcode};
pub use schema::{DecodeError, EncodeError, Schema, SchemaRecord};
pub use state::Election;
pub use submitter::{assemble_transaction, fetch_election, submit, submit_create_election};
