mod app;
pub mod dialogs;

pub use app::FaceLoginApp;
