//! Headless-browser pool and scripted-interaction primitives.
//!
//! A [`BrowserPool`] owns a fixed number of Chromium sessions launched at
//! startup. Command handlers borrow exactly one session at a time through
//! an RAII [`Lease`] (or the [`BrowserPool::run_function`] convenience,
//! which also configures viewport and page zoom) and drive it with the
//! typed step primitives in [`script`]. Transient render-timing waits go
//! through [`retry::poll`], which fails after a bounded number of
//! attempts with the last cause attached.

pub mod detect;
pub mod error;
pub mod pool;
pub mod retry;
pub mod script;
pub mod types;

pub use {
    chromiumoxide::Page,
    error::BrowserError,
    pool::{BrowserPool, BrowserSession, Lease, SlotPool},
    retry::{PollError, PollPolicy},
    types::{BrowserPoolConfig, ElementBounds, Presence, Viewport},
};
