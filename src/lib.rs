//! Launchdesk - conversational launch assistant for new store owners
//!
//! A chat service that lets a language model drive a catalogue of business
//! tools (store setup, product management, research, legal, branding and
//! pitch decks), streaming each step to the client as UI message events.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
