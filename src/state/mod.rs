//! State module for tracking crawl progress
//!
//! This module owns the only state shared between concurrently executing
//! units of work.
//!
//! # Components
//!
//! - `CrawlState`: the visited set and the pending-work table behind one lock
//! - `WorkStatus`: whether a pending page is queued or running

mod crawl_state;
mod work_status;

// Re-export main types
pub use crawl_state::CrawlState;
pub use work_status::WorkStatus;
