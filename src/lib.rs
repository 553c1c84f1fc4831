//! Client-side wrapper for the [Google Cloud Logging v2 REST API].
//!
//! A [`Client`] binds a project id to a [`Connection`] (the transport seam;
//! [`HttpConnection`] is the stock implementation). A [`Logger`] is a named,
//! project-scoped target: it writes single text/struct/proto entries, deletes
//! all of its entries, and lists previously written entries page by page. A
//! [`Batch`] accumulates entries locally and flushes them in one call.
//!
//! [Google Cloud Logging v2 REST API]: https://cloud.google.com/logging/docs/reference/v2/rest

mod batch;
mod client;
mod connection;
mod entry;
mod error;
mod logger;
mod proto;

#[cfg(test)]
pub(crate) mod test_util;

pub use batch::Batch;
pub use client::{
    Client, Connection, EntryPage, ListOptions, ListOptionsBuilder, ListOptionsBuilderError,
    SortOrder,
};
pub use connection::HttpConnection;
pub use entry::{Payload, ReceivedEntry, Resource};
pub use error::{ApiStatus, BoxError, Error, Result};
pub use logger::Logger;
pub use proto::ProtoMessage;

pub use reqwest::Method;
