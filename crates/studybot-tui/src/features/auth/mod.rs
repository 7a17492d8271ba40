//! Auth feature: login, sign-up and password reset forms.

mod render;
mod state;
mod update;

pub use render::render_auth;
pub use state::{AuthFormState, Notice, NoticeKind};
pub use update::handle_auth_key;
