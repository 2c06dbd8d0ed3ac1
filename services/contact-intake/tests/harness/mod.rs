// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact form abuse simulation.
//!
//! This module provides utilities for simulating automated submission
//! patterns against the pipeline to validate its spam controls.

pub mod attacks;
pub mod generators;
pub mod metrics;
