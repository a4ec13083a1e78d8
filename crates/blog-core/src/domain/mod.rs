//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{PageRequest, PostPage, RowRange, total_pages};
pub use post::{FIELDS_REQUIRED, NewPost, Post, PostId, PostPatch};
pub use user::{AuthEvent, AuthEventKind, Credentials, Session, SignUpOutcome, User, mask_email};
