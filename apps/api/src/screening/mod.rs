// Screening core: tokenize JD → ATS score → suggestions → recruiter ranking.
// Everything except `handlers` and `extraction` is pure and does not log.

pub mod ats_score;
pub mod extraction;
pub mod handlers;
pub mod ranking;
pub mod suggestions;
pub mod tokenizer;
