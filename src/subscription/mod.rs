//! Provides structures and traits related to subscription management.
//!
//! This module includes `Subscriber` for handling delivered values, `Subscription`
//! for detaching a registration from its stream, and the `Subscribeable` and
//! `Disposable` traits both sides of a registration are built on.
pub mod subscribe;
