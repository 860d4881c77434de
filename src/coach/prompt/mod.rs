//! Prompt construction modules.

pub mod persona;
pub mod prompt_builder;

pub use persona::{COMPACT_PERSONA, VERBOSE_PERSONA};
pub use prompt_builder::{build_prompt, render_profile, truncate_chars};
