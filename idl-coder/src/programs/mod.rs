//! IDL documents and coders for bundled SPL programs.
//!
//! Neither program emits events, so both exercise the not-applicable event
//! coder:
//! - `spl_record`: no user-defined types either
//! - `spl_feature_proposal`: one user-defined type

pub mod spl_feature_proposal;
pub mod spl_record;
