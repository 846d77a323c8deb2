// Content module - the items typed into the launched application.

pub mod commit;
pub mod posts;

pub use commit::{ContentCommitter, next_available_path};
pub use posts::{ContentError, Post, load_posts, offline_posts, posts_or_offline};
