//! Tests for building, assembling and solving models.

#[cfg(test)]
mod assembly;
#[cfg(test)]
mod basic;
