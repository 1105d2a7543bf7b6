pub mod cache;
pub mod catalog;
pub mod focus;
pub mod form;
pub mod protocol;
pub mod upload;
pub mod work;

pub use cache::{FetchOutcome, FetchTicket, WorkCache};
pub use catalog::{distinct_categories, filter_choices, filter_works, FilterChoice, ALL_LABEL};
pub use focus::{next_focus_index, TabDirection, FOCUSABLE_SELECTOR};
pub use form::{AddProjectDraft, DraftField, LoginField, LoginForm};
pub use protocol::{LoginRequest, LoginResponse, DEFAULT_API_BASE};
pub use upload::{check_upload, DragDepth, UploadError, MAX_UPLOAD_BYTES};
pub use work::{parse_work, parse_works, Category, Work};
