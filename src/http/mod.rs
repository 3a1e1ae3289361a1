//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one GET request per connection,
//! answered from the filesystem or the diagnostics endpoint, then closed.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine (read, route, write, close)
//! - **`parser`**: Parses the request head from a byte buffer
//! - **`request`**: Request representation and methods
//! - **`router`**: Ordered routing rules and file lookup
//! - **`path`**: Maps URL paths onto namespace roots, rejecting traversal
//! - **`mime`**: Content type detection and the allow-list
//! - **`response`**: Response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request head
//!        └──────┬──────┘
//!               │ Head received (malformed → 400, EOF/timeout → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and build the response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Routes
//!
//! | Path            | Served from            |
//! |-----------------|------------------------|
//! | `/debug`        | JSON diagnostics       |
//! | `/assets/<name>`| images root            |
//! | `/misc/<name>`  | misc root              |
//! | `/`             | site root `index.html` |
//! | `/<other>`      | site root              |

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod router;
pub mod writer;
