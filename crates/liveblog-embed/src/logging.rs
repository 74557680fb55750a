//! Tracing targets.
//!
//! The embed logs through the `tracing` crate and never installs a
//! subscriber. Filter on these targets to follow one subsystem, e.g.
//! `RUST_LOG=liveblog_embed::updates=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Page store rebuilds and page fetches.
    pub const PAGES: &str = "liveblog_embed::pages";
    /// Update queries, reconciliation and the watermark.
    pub const UPDATES: &str = "liveblog_embed::updates";
    /// Posts service requests.
    pub const SERVICE: &str = "liveblog_embed::service";
    /// HTTP transport (emitted by `liveblog-net`).
    pub const HTTP: &str = liveblog_net::http::LOG_TARGET;
}
