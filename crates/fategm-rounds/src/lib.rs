//! Fate GM Helper — round lifecycle and action-submission bounded context.
//!
//! Responsible for opening and closing turn-based rounds within a campaign,
//! recording per-slot action submissions while a round is open, and
//! archiving a round's action set once closed.

pub mod application;
pub mod domain;
pub mod repository;
