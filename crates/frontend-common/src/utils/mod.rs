//! Small pure helpers shared by the components

pub mod class_names;

pub use class_names::{ClassValue, cn, merge_classes};
