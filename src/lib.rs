// SPDX-License-Identifier: MIT

//! Boolean rule evaluation against typed variable bindings.
//!
//! ```
//! use rulegate::rules::{evaluate, Bindings};
//!
//! let bindings = Bindings::new().with("DESK", "AGRO").with("PRIORITY", 5);
//! let routed = evaluate(&bindings, "DESK = 'AGRO' AND (PRIORITY > 3 OR URGENT NOT NULL)")?;
//! assert!(routed);
//! # Ok::<(), rulegate::error::RuleError>(())
//! ```

pub mod error;
pub mod rules;
pub mod ruleset;
pub mod server;
