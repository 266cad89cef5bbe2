pub mod project_ops;
pub mod sort;
pub mod task_ops;
pub mod views;
