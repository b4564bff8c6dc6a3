//! Analysis pipeline: prompt composition on the way out, risk
//! classification and record extraction on the way back.

pub mod classify;
pub mod extract;
pub mod prompt;
