//! Declarative input model for the storefront block renderer.
//!
//! A page is a tree of [`Block`] values deserialized from JSON. Each block
//! carries its presentation (`wrapper`, `class`, `style`), bindings into the
//! render data, an optional visibility [`Condition`], event wiring
//! ([`EventDescriptor`] / [`Action`]) and a [`BlockKind`] discriminator that
//! selects a specialized renderer.
#![warn(unsafe_op_in_unsafe_fn)]

mod block;
mod carousel;
mod condition;
mod error;
mod event;
mod loader;
mod settings;
mod wrapper;

#[cfg(test)]
mod test_parse;

pub use block::{
    Animation, Block, BlockKind, BlockState, DEFAULT_ITERATOR, MarqueeDirection, RepeaterSpec, Walk,
};
pub use carousel::{
    Autoplay, AutoplayConfig, AutoplayOptions, Breakpoint, BreakpointConfig, CarouselConfig,
    CarouselOptions, Coverflow, CoverflowConfig, DEFAULT_AUTOPLAY_DELAY_MS, Effect, Fade,
    FadeConfig, Pagination, PaginationConfig, PaginationKind, PaginationOptions,
};
pub use condition::{Condition, Operator};
pub use error::{Error, excerpt_at};
pub use event::{Action, EventDescriptor, EventKind, is_binding_path};
pub use loader::{
    load_block_from_str, load_blocks_from_path, load_blocks_from_str, load_data_from_path,
    load_data_from_str, load_settings_from_path,
};
pub use settings::{DEFAULT_DEBOUNCE_MS, DEFAULT_WRAPPER_CACHE, EngineSettings};
pub use wrapper::{ParsedWrapper, parse_wrapper};

/// A dynamic JSON value as found in block data and render data.
pub type Value = serde_json::Value;

/// A JSON object: the shape of block `data`, render data and item context.
pub type Map = serde_json::Map<String, Value>;

/// Data key holding the running cart item count. Inherited unchanged from ancestors.
pub const CART_COUNT_KEY: &str = "cart_count";

/// Data key holding the running cart total. Inherited unchanged from ancestors.
pub const CART_TOTAL_KEY: &str = "cart_total";
