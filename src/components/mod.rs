//! UI components.

pub mod mindmap;
