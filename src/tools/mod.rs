pub mod actions;
pub mod browser;
pub mod elements;
pub mod navigation;
pub mod screenshot;
pub mod script;
