//! Taskweave - a personal task board with an acyclic task dependency graph.
//!
//! The crate provides the domain model, a task store with in-memory and
//! JSONL backends, the [`service::DependencyGraphService`] that keeps each
//! project's dependency graph acyclic, and a [`board::Board`] that applies
//! the dependency rules to task updates and deletions. The `taskweave`
//! binary drives all of it from the command line.

#![forbid(unsafe_code)]

pub mod app;
pub mod board;
pub mod domain;
pub mod error;
pub mod graph;
pub mod service;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

pub mod output;
