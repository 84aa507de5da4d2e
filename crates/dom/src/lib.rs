//! Mutable render tree for Hotelier dashboard pages.

mod document;
mod error;
mod markup;
mod node;
mod page;
mod style;

pub use document::{Descendants, Document, ScrollRequest, Viewport};
pub use error::DomError;
pub use node::{ElementData, Node, NodeData, NodeId};
pub use page::{ElementSpec, PageNode, PageSpec, StyleSpec};
pub use style::{ComputedStyle, Display, InlineStyle, ScrollBehavior, ScrollBlock, Visibility};
