pub mod domain;
pub mod fallback;
pub mod ports;
pub mod sentiment;
pub mod session;
pub mod transcript;

pub use domain::{CandidateProfile, ConversationTurn, Position, SentimentLabel, UnknownPosition};
pub use fallback::FallbackResponder;
pub use ports::{FollowUpResponder, PortError, PortResult, Responder, SentimentAnalyzer};
pub use session::{
    CallControl, InterviewSession, SessionError, SessionPhase, SessionPorts, SessionResult,
};
pub use transcript::ConversationLog;
