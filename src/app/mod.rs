pub mod layout;
#[cfg(feature = "cli")]
pub mod render;
pub mod toaster;

pub use layout::{AppContext, Rendered, RootLayout};
pub use toaster::{Toast, ToastKind, Toaster, ToasterOptions, ToasterPosition};
