//! Serial line protocol.
//!
//! ```text
//! ┌───────────┐   ┌─────────────┐   ┌────────────────┐   ┌─────────┐
//! │ Transport │──▶│ LineReader  │──▶│ CommandService │──▶│  Reply  │──▶ Transport
//! │  (trait)  │   │ (\n framing)│   │  (app layer)   │   │ (encode)│
//! └───────────┘   └─────────────┘   └────────────────┘   └─────────┘
//! ```

pub mod line_reader;
pub mod reply;
pub mod transport;
