//! Board operations on an in-memory [`crate::entities::UpdatesDocument`].
//!
//! Route handlers load the document, call into these modules, and save the
//! result. Nothing here touches storage or the network.

pub mod dedup;
pub mod ingest;
pub mod receive;
pub mod reconcile;
