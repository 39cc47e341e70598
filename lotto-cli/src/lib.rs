pub mod analysis;
pub mod display;
pub mod i18n;
pub mod import;
pub mod session;
pub mod speech;
