//! # Page graph
//!
//! Pages are named pieces of content with ordered, platform-scoped buttons. A button may run an
//! action, point at another page by name, and/or name a command; page references are resolved
//! lazily through the [`PageTable`], so dangling names are not an error.

mod button;
mod error;
mod page;
mod table;

pub use button::{Button, ButtonAction, ButtonBuilder, ButtonStyle};
pub use error::BuildError;
pub use page::{Page, PageBuilder, PageHook};
pub use table::PageTable;
