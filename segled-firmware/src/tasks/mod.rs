//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod console;
pub mod dispatch;
pub mod scan;

pub use console::console_task;
pub use dispatch::dispatch_task;
pub use scan::scan_task;
