pub mod extract;
pub mod mark;
pub mod reconcile;
pub mod selectors;
