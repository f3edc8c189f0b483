//! Background Task Scheduling Module
//!
//! Thin scheduling layer over the tokio runtime for the node's recurring
//! work. Periodic tasks re-arm themselves after every run and absorb their
//! own failures, so a bad cycle never kills the schedule; one-shot
//! submission keeps listener notification off the producer's call path.

pub mod schedule;
