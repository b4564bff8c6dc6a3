pub mod analysis;
pub mod chat;
pub mod enums;
pub mod lab;
pub mod profile;

pub use analysis::{AnalysisKind, AnalysisResult, ExtractedRecord, ScanRequest};
pub use chat::ChatMessage;
pub use enums::{InvalidEnum, MessageRole, RiskLevel, ScanMode, Theme};
pub use lab::{lab_series, LabDataPoint};
pub use profile::{HistoryItem, UserProfile};
