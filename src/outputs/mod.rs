//! Output generation.
//!
//! - [`json`]: the article store, a single JSON array rewritten on every run
//!
//! ```text
//! data/
//! ├── backfill.json      # overwritten by `backfill`
//! └── new_article.json   # merged by `poll` / `watch`
//! ```

pub mod json;
