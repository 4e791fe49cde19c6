mod goal;
mod note;
mod tab;
mod task;

pub use goal::Goal;
pub use note::Note;
pub use tab::Tab;
pub use task::{Priority, Task};
