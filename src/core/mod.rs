pub mod login;
pub mod recognizer;
pub mod webcam;

pub use login::{failure_message, LoginOutcome, LoginService};
pub use recognizer::{parse_output, RecognitionResult, Recognizer};
pub use webcam::{error_frame, TickEvent, Webcam, WebcamState};
