//! Loads RDF quads as linked, traversable resources.
//!
//! An [`RdfObjectLoader`] consumes a quad stream and interns every term it sees as a
//! [`Resource`] in a [`Registry`]. Resources link to each other by predicate, RDF
//! lists are reassembled into [`Resource::list`], and properties can be read by
//! short names resolved through a JSON-LD context.
//!
//! ```no_run
//! use rdfobject::{LoaderConfig, RdfObjectLoader, Term};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = LoaderConfig::builder()
//!     .context(json!({ "ex": "http://example.org/" }))
//!     .build()?;
//! let mut loader = RdfObjectLoader::new(config);
//! loader.import(rdfobject::io::open_quads(std::path::Path::new("data.ttl"))?)?;
//!
//! let resources = loader.resources();
//! if let Some(id) = resources.find(&Term::named_node("http://example.org/thing")) {
//!     println!("{}", resources.to_json(id));
//! }
//! # Ok(())
//! # }
//! ```

extern crate derive_builder;

pub mod codec;
pub mod config;
pub mod consts;
pub mod context;
pub mod errors;
pub mod io;
pub mod list;
pub mod loader;
pub mod properties;
pub mod resource;
pub mod serialize;
pub mod stream;
pub mod term;

pub use crate::codec::{string_to_term, term_to_string};
pub use crate::config::{LoaderConfig, LoaderConfigBuilder};
pub use crate::context::Context;
pub use crate::errors::{ContextError, ShortcutError};
pub use crate::list::RdfListMaterializer;
pub use crate::loader::{CompactedValue, RdfObjectLoader};
pub use crate::properties::{PropertyRead, PropertyWrite, ShortcutProperties, SingularProperties};
pub use crate::resource::{Registry, Resource, ResourceId};
pub use crate::stream::{broadcast, QuadSink};
pub use crate::term::{Quad, Term};

/// Copies `RDFOBJECT_LOG` into `RUST_LOG` when it is set.
///
/// `RDFOBJECT_LOG` takes precedence over `RUST_LOG`. The logger (e.g.
/// `env_logger::init()`) must be initialized after this call for the level to
/// take effect.
pub fn init_logging() {
    if let Ok(log_level) = std::env::var("RDFOBJECT_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
}
