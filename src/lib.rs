// Library root
// -----------
// This crate exposes the lookup pipeline behind the `taxa-lookup` binary.
// The binary (`main.rs`) builds a resolver from the command line and hands
// it to the UI loop.
//
// Module responsibilities:
// - `cache`: FIFO-bounded map from lowercased common name to hierarchy.
// - `dedupe`: collapses near-duplicate names before they are offered as
//   choices.
// - `fetch`: blocking GET with retries and exponential backoff.
// - `api`: the two ITIS endpoints and their JSON shapes.
// - `taxonomy`: the kingdom-to-species hierarchy and its descriptions.
// - `select`: parsing a numbered choice and the `Prompt` seam.
// - `resolver`: ties the above together for one lookup.
// - `categorize`: keyword buckets and name priority for display hints.
// - `config`, `error`, `ui`: command line, error types, terminal flows.
pub mod api;
pub mod cache;
pub mod categorize;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod fetch;
pub mod resolver;
pub mod select;
pub mod taxonomy;
pub mod ui;
