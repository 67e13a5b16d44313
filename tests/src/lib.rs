//! Cross-crate tests for `scout`, driven by in-process stub sources so no
//! network access or external binary is needed.

pub mod stubs;

#[cfg(test)]
mod orchestration;
