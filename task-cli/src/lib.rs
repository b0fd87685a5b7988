pub mod board;
pub mod client;
pub mod session;
pub mod task;
pub mod view;

pub use board::TaskBoard;
pub use client::{ClientError, TaskClient};
pub use session::{SessionLoad, SessionStore, UserProfile};
pub use task::{NewTask, Task, TaskUpdate};
pub use view::{Filter, TaskStats};
