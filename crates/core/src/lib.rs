//! # Taggable Core
//!
//! Free-text tag sets attached to document records.
//!
//! ## Features
//!
//! - **Normalization** - delimited strings or lists become trimmed, non-empty tags
//! - **Record facet** - `tags` / `tag_list` accessors for any host embedding a [`TagSet`]
//! - **Matching** - any-of, all-of and none-of filters over the tag field
//! - **Frequency tables** - per-tag record counts, optionally scoped by field values
//!
//! ## Architecture
//!
//! ```text
//! "linux, tucuman"  /  ["linux", "tucuman"]
//!     │
//!     ├──> TagInput::normalize
//!     │      └─> TagSet on the record (Taggable)
//!     │
//!     ├──> TaggedCollection (per record type, base Scope)
//!     │      ├─ TagQueryBuilder ──> Filter ──> DocumentStore::find
//!     │      └─ TagAggregator   ──> Vec<TagFrequency>
//!     │
//!     └──> DocumentStore adapter (taggable-doc-store)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use taggable_core::{DocumentStore, NewDocument, Scope, TaggedCollection};
//!
//! async fn report(store: impl DocumentStore) -> taggable_core::Result<()> {
//!     let users = TaggedCollection::new(store, "users");
//!     users
//!         .create(NewDocument::new().with_field("name", "Tuquito").with_tag_list("linux, tucuman"))
//!         .await?;
//!
//!     for entry in users.all_tags(&Scope::new()).await? {
//!         println!("{}: {}", entry.name, entry.count);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregate;
mod collection;
mod error;
mod normalize;
mod query;
mod record;
mod store;
mod types;

pub use aggregate::{tag_frequencies, TagAggregator};
pub use collection::TaggedCollection;
pub use error::{Result, StoreError};
pub use normalize::{normalize_tags, TagInput, TAG_DELIMITER};
pub use query::{Condition, Filter, TagMatch, TagQueryBuilder};
pub use record::{TagSet, Taggable, TAG_LIST_SEPARATOR};
pub use store::DocumentStore;
pub use types::{
    Document, DocumentId, NewDocument, Scope, Tag, TagFrequency, ID_FIELD, TAGS_FIELD,
};
