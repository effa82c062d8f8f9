// Adapters for the ports in `app::ports`

pub mod git_publisher;
pub mod http_client;
pub mod pdf_backend;

pub use git_publisher::{DryRunPublisher, GitPublisher};
pub use http_client::ReqwestSheetSource;
pub use pdf_backend::PdfSheetBackend;
