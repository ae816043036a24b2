//! Input drivers shared by both nodes.

pub mod button;
