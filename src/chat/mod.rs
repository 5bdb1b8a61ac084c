mod history;
mod session;
mod timers;
mod voice;

pub use history::*;
pub use session::*;
pub use timers::ReplyTimers;
pub use voice::VoiceRecorder;
