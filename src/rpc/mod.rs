//! Inbound command channel.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 Command Gateway                  │
//! │                                                  │
//! │  ┌───────────┐   ┌────────────┐   ┌───────────┐  │
//! │  │ Transport │──▶│  Decoder   │──▶│ AppCommand│  │
//! │  │ (UDP)     │   │ (JSON-RPC, │   │  → queue  │  │
//! │  └───────────┘   │  GET query)│   └───────────┘  │
//! │                  └────────────┘                  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Fire-and-forget: malformed datagrams are logged and dropped, and no
//! response is ever sent.

pub mod gateway;
pub mod transport;
