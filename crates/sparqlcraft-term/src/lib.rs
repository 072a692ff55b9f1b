//! Injection-safe SPARQL term text.
//!
//! Construction direction: native [`Value`]s are converted into [`Term`]s by
//! the exhaustive dispatch in [`value`], with string literals escaped by
//! [`escape`]. [`Template`] splices terms into literal query text.
//!
//! Result direction: [`coerce`] maps wire bindings (see [`ResultSet`]) back to
//! [`NativeValue`]s. It never fails; unparsable values stay raw text.
//!
//! The two directions share vocabulary constants and nothing else.

pub mod coerce;
pub mod config;
pub mod error;
pub mod escape;
pub mod interpolate;
pub mod results;
pub mod term;
pub mod value;
pub mod vocab;

pub use coerce::{coerce, BindingValue, NativeValue, TermKind};
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use escape::{escape_string_literal, Quote};
pub use interpolate::{interpolate, Template};
pub use results::ResultSet;
pub use term::Term;
pub use value::{convert, Converter, Key, Value};
