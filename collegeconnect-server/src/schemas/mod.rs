//! Request / response bodies exchanged over HTTP.

pub mod sync;
pub mod updates;
