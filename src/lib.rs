//! Valuations - VIN valuation and instant-offer ingestion pipeline.
//!
//! Consumes revaluation requests from a durable queue, routes each VIN to a
//! pricing vendor by the owning device's country, persists raw vendor
//! payloads append-only, and projects them into a canonical per-vehicle
//! valuation/offer view on read.
//!
//! # Architecture
//!
//! Hexagonal: `port` defines the trait seams (vendors, device directory,
//! geocoder, repository, queue), `adapter` implements them against HTTP,
//! SQLite, and memory, and `service` holds the vendor-agnostic pipeline
//! logic.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - VINs, vendor routing, records, and the projected view model
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions for external collaborators
//! - [`adapter`] - HTTP clients, the Diesel store, and the in-memory queue
//! - [`service`] - Orchestrator, projector, queue consumer, and facade
//! - [`app`] - Application wiring
//!
//! # Features
//!
//! - `testkit` - Scripted fakes for the port traits, for use in tests

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
