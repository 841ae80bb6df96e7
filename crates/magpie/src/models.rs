//! These models represent the objects passed around by the session loop.
//!
//! There are two related formats we need to interact with:
//! - openai-style messages/tools, sent over the wire to the LLM
//! - store requests, dispatched to the record store behind the tool boundary
//!
//! Incoming wire data is immediately converted into the internal structs
//! using to/from helpers, so the rest of the crate never touches the wire
//! format directly.
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
