//! Implementation of the four stages of a harvest run.
//!
//! ## Overview
//!
//! A run follows 4 stages:
//! 1. Enumeration - List every repository of the organization (`full` checkpoint)
//! 2. Filtering - Split `full` by the partition pattern (`selected` / `leftover`)
//! 3. Cloning - Clone each `selected` repository into the repos directory
//! 4. Archiving - Zip each cloned directory into the archives directory
//!
//! Stages never pass data to each other in memory. Each reads its input from a
//! checkpoint (or, for archiving, from the repos directory) so any of them can
//! be re-run on its own. Item-level failures in stages 3 and 4 are logged and
//! recorded in the stage's report; everything else halts the run.

pub mod archive;
pub mod clone;
pub mod enumerate;
pub mod filter;
pub mod orchestrator;

// Stage aliases in execution order
pub use self::archive as stage4;
pub use self::clone as stage3;
pub use self::enumerate as stage1;
pub use self::filter as stage2;
