//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the game rules so route handlers can stay focused on
//! protocol translation.

pub mod round;
