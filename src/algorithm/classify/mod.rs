//! Rule-based classifiers
//!
//! Both classifiers walk an ordered rule list and stop at the first match.
//! Order matters: a drug name can contain several tokens and ICD prefixes
//! nest (`F11` inside `F1`).

pub mod diagnosis;
pub mod medication;
